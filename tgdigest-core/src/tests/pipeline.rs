use std::collections::HashMap;
use std::sync::Mutex;

use tgdigest_ai::{Summarizer, TgdigestAiResult};

use crate::models::{ChatEntity, ChatId, Dialog, Folder, RawMessage};
use crate::pipeline::process_message;
use crate::platform::{ChatPlatform, DialogCursor, Formatting};
use crate::{
    Config, DIGEST_FOOTER, DIGEST_HEADER, DigestError, DigestPipeline, MESSAGE_LIMIT,
    MessageProcessingError, Stage, wrap_digest,
};

const OUTPUT_CHAT: ChatId = ChatId::from_marked(1);

#[derive(Debug, thiserror::Error)]
#[error("fake platform error: {0}")]
struct FakeError(String);

#[derive(Default)]
struct FakePlatform {
    folders: Vec<Folder>,
    dialogs: Vec<Dialog<ChatId>>,
    messages: HashMap<ChatId, Vec<RawMessage>>,
    usernames: HashMap<ChatId, String>,
    fetched: Mutex<Vec<(ChatId, usize)>>,
    sent: Mutex<Vec<(ChatId, String)>>,
}

struct FakeDialogs(std::vec::IntoIter<Dialog<ChatId>>);

impl DialogCursor for FakeDialogs {
    type Chat = ChatId;
    type Error = FakeError;

    async fn next_dialog(&mut self) -> Result<Option<Dialog<ChatId>>, FakeError> {
        Ok(self.0.next())
    }
}

impl ChatPlatform for FakePlatform {
    type Chat = ChatId;
    type Error = FakeError;
    type Dialogs = FakeDialogs;

    async fn resolve_chat(&self, identity: &str) -> Result<ChatId, FakeError> {
        match identity {
            "me" => Ok(OUTPUT_CHAT),
            other => Err(FakeError(format!("chat {other} not found"))),
        }
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, FakeError> {
        Ok(self.folders.clone())
    }

    fn iter_dialogs(&self) -> FakeDialogs {
        FakeDialogs(self.dialogs.clone().into_iter())
    }

    async fn get_messages(&self, chat: &ChatId, limit: usize) -> Result<Vec<RawMessage>, FakeError> {
        self.fetched.lock().unwrap().push((*chat, limit));
        Ok(self.messages.get(chat).cloned().unwrap_or_default())
    }

    async fn get_entity(&self, chat: &ChatId) -> Result<ChatEntity, FakeError> {
        Ok(ChatEntity {
            id: Some(*chat),
            username: self.usernames.get(chat).cloned(),
        })
    }

    async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
        formatting: Formatting,
    ) -> Result<(), FakeError> {
        assert_eq!(formatting, Formatting::Markdown);
        self.sent.lock().unwrap().push((*chat, text.to_string()));
        Ok(())
    }
}

impl FakePlatform {
    fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(chat, text)| {
                assert_eq!(*chat, OUTPUT_CHAT);
                text.clone()
            })
            .collect()
    }
}

struct FakeSummarizer {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &str) -> TgdigestAiResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

const NEWS: ChatId = ChatId::from_marked(-1001234567890);
const FRIENDS: ChatId = ChatId::from_marked(-555);
const STRANGER: ChatId = ChatId::from_marked(42);

fn config() -> Config {
    Config {
        folder_id: 3,
        output_chat: "me".to_string(),
    }
}

fn dialog(chat_id: ChatId, title: &str, unread_count: u32) -> Dialog<ChatId> {
    Dialog {
        chat_id,
        title: title.to_string(),
        unread_count,
        chat: chat_id,
    }
}

fn texts(range: std::ops::Range<i32>) -> Vec<RawMessage> {
    range
        .rev()
        .map(|id| RawMessage {
            id,
            text: Some(format!("message {id}")),
        })
        .collect()
}

fn platform() -> FakePlatform {
    FakePlatform {
        folders: vec![
            Folder {
                id: 2,
                title: "Work".to_string(),
                included_chats: vec![STRANGER],
            },
            Folder {
                id: 3,
                title: "Reading".to_string(),
                included_chats: vec![NEWS, FRIENDS],
            },
        ],
        dialogs: vec![
            dialog(STRANGER, "Stranger", 4),
            dialog(NEWS, "News", 35),
            dialog(FRIENDS, "Friends", 2),
        ],
        messages: HashMap::from([
            (STRANGER, texts(1..5)),
            (NEWS, texts(100..135)),
            (FRIENDS, texts(1..3)),
        ]),
        usernames: HashMap::from([(NEWS, "news".to_string())]),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_sends_single_digest() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("short digest");
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(report.chats, 2);
    assert_eq!(report.messages, 22);
    assert_eq!(report.sent, 1);
    assert_eq!(platform.sent_texts(), vec![wrap_digest("short digest")]);
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_run_stage_transitions() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("short digest");
    let config = config();

    let pipeline = DigestPipeline::new(&platform, &summarizer, &config);
    assert_eq!(pipeline.stage(), Stage::Idle);

    pipeline.run().await.unwrap();
    assert_eq!(pipeline.stage(), Stage::Done);
}

#[tokio::test]
async fn test_run_failure_ends_in_failed_stage() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("digest");
    let config = Config {
        folder_id: 99,
        ..config()
    };

    let pipeline = DigestPipeline::new(&platform, &summarizer, &config);
    assert!(pipeline.run().await.is_err());
    assert_eq!(pipeline.stage(), Stage::Failed);
}

#[tokio::test]
async fn test_run_only_reads_folder_chats_with_capped_limit() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("digest");
    let config = config();

    DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let fetched = platform.fetched.lock().unwrap().clone();
    assert_eq!(fetched, vec![(NEWS, 20), (FRIENDS, 2)]);
}

#[tokio::test]
async fn test_run_prompt_contains_chats_and_links() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("digest");
    let config = config();

    DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let prompts = summarizer.prompts.lock().unwrap();
    let prompt = &prompts[0];

    assert!(prompt.contains("News (35 непрочитанных сообщений):"));
    assert!(prompt.contains("Friends (2 непрочитанных сообщений):"));
    assert!(prompt.contains("link: https://t.me/news/134"));
    assert!(prompt.contains("link: https://t.me/c/555/1"));
    assert!(!prompt.contains("https://t.me/news/114"));
    assert!(!prompt.contains("Stranger"));
}

#[tokio::test]
async fn test_run_skips_unprocessable_messages() {
    let mut platform = platform();
    platform.messages.insert(
        FRIENDS,
        vec![
            RawMessage {
                id: 3,
                text: None,
            },
            RawMessage {
                id: 2,
                text: Some(String::new()),
            },
            RawMessage {
                id: 1,
                text: Some("hello".to_string()),
            },
        ],
    );
    platform.dialogs[2].unread_count = 3;
    let summarizer = FakeSummarizer::new("digest");
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    assert_eq!(report.messages, 21);
    assert_eq!(report.sent, 1);
}

#[tokio::test]
async fn test_run_folder_not_found() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("digest");
    let config = Config {
        folder_id: 99,
        ..config()
    };

    let result = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await;

    assert!(matches!(result, Err(DigestError::FolderNotFound(99))));
    assert!(platform.sent_texts().is_empty());
    assert!(platform.fetched.lock().unwrap().is_empty());
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_run_empty_digest() {
    let mut platform = platform();
    platform.dialogs = vec![
        dialog(STRANGER, "Stranger", 4),
        dialog(NEWS, "News", 0),
        dialog(FRIENDS, "Friends", 0),
    ];
    let summarizer = FakeSummarizer::new("digest");
    let config = config();

    let result = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await;

    assert!(matches!(result, Err(DigestError::EmptyDigest(title)) if title == "Reading"));
    assert_eq!(summarizer.calls(), 0);
    assert!(platform.sent_texts().is_empty());
}

#[tokio::test]
async fn test_run_unknown_output_chat() {
    let platform = platform();
    let summarizer = FakeSummarizer::new("digest");
    let config = Config {
        output_chat: "@nobody".to_string(),
        ..config()
    };

    let result = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await;

    assert!(matches!(result, Err(DigestError::Platform(_))));
    assert_eq!(summarizer.calls(), 0);
    assert!(platform.sent_texts().is_empty());
}

fn wrap_overhead() -> usize {
    wrap_digest("").chars().count()
}

#[tokio::test]
async fn test_dispatch_exact_limit_is_single_message() {
    let platform = platform();
    let body = "a".repeat(MESSAGE_LIMIT.get() - wrap_overhead());
    let summarizer = FakeSummarizer::new(body.clone());
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let sent = platform.sent_texts();
    assert_eq!(report.sent, 1);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chars().count(), MESSAGE_LIMIT.get());
}

#[tokio::test]
async fn test_dispatch_counts_chars_not_utf16_units() {
    let platform = platform();
    let body = "📚".repeat(MESSAGE_LIMIT.get() - wrap_overhead());
    let summarizer = FakeSummarizer::new(body);
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let sent = platform.sent_texts();
    assert_eq!(report.sent, 1);
    assert_eq!(sent[0].chars().count(), MESSAGE_LIMIT.get());
    assert!(sent[0].encode_utf16().count() > 4096);
}

#[tokio::test]
async fn test_dispatch_one_over_limit_is_split() {
    let platform = platform();
    let body = "a".repeat(MESSAGE_LIMIT.get() - wrap_overhead() + 1);
    let summarizer = FakeSummarizer::new(body.clone());
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let sent = platform.sent_texts();
    assert_eq!(report.sent, 2);
    assert_eq!(sent[0], DIGEST_HEADER);
    assert_eq!(sent[1], format!("{body}\n\n{DIGEST_FOOTER}"));
}

#[tokio::test]
async fn test_dispatch_footer_only_on_last_part() {
    let platform = platform();
    let body = (0..600)
        .map(|i| format!("{i}. Новости дня - https://t.me/news/{i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let summarizer = FakeSummarizer::new(body.clone());
    let config = config();

    let report = DigestPipeline::new(&platform, &summarizer, &config)
        .run()
        .await
        .unwrap();

    let sent = platform.sent_texts();
    assert!(sent.len() > 3);
    assert_eq!(report.sent, sent.len());
    assert_eq!(sent[0], DIGEST_HEADER);

    let (last, parts) = sent[1..].split_last().unwrap();
    for part in parts {
        assert!(!part.contains(DIGEST_FOOTER));
        assert!(part.chars().count() <= MESSAGE_LIMIT.get());
    }
    assert!(last.ends_with(&format!("\n{DIGEST_FOOTER}")));

    let restored: String = parts.concat() + last.trim_end_matches(DIGEST_FOOTER);
    assert_eq!(restored, format!("{body}\n\n"));
}

#[test]
fn test_process_message() {
    let entity = ChatEntity {
        id: Some(FRIENDS),
        username: None,
    };

    let message = process_message(
        RawMessage {
            id: 5,
            text: Some("hi".to_string()),
        },
        &entity,
    )
    .unwrap();
    assert_eq!(message.content, "hi");
    assert_eq!(message.permalink, "https://t.me/c/555/5");

    assert!(matches!(
        process_message(RawMessage { id: 6, text: None }, &entity),
        Err(MessageProcessingError::ServiceMessage(6))
    ));
    assert!(matches!(
        process_message(
            RawMessage {
                id: 7,
                text: Some("  ".to_string())
            },
            &entity
        ),
        Err(MessageProcessingError::EmptyText(7))
    ));
}
