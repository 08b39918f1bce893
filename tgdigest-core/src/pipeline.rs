use std::borrow::Cow;
use std::cell::Cell;
use std::num::NonZeroUsize;

use tgdigest_ai::Summarizer;

use crate::chunk::split_message_into_chunks;
use crate::config::Config;
use crate::format::{
    DIGEST_HEADER, SUMMARIZATION_PROMPT, build_prompt, sign_last_chunk, wrap_digest,
};
use crate::link::build_permalink;
use crate::models::{
    ChatEntity, ChatMessage, Dialog, Folder, MAX_MESSAGES_PER_CHAT, RawMessage, UnreadChat,
};
use crate::platform::{ChatPlatform, DialogCursor, Formatting};
use crate::{DigestError, DigestResult, MessageProcessingError};

/// Counted in chars. Telegram counts its 4096 limit in UTF-16 units, so a
/// digest heavy in emoji or other non-BMP text can still be rejected.
pub const MESSAGE_LIMIT: NonZeroUsize = NonZeroUsize::new(4000).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Authenticated,
    FoldersLoaded,
    DialogsCollected,
    Summarized,
    Dispatched,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigestReport {
    /// Chats that made it into the prompt
    pub chats: usize,
    /// Messages that made it into the prompt
    pub messages: usize,
    /// Messages posted to the output chat
    pub sent: usize,
}

/// One digest run over an already authorized platform session.
pub struct DigestPipeline<'a, P, S> {
    platform: &'a P,
    summarizer: &'a S,
    config: &'a Config,
    stage: Cell<Stage>,
}

impl<'a, P: ChatPlatform, S: Summarizer> DigestPipeline<'a, P, S> {
    pub fn new(platform: &'a P, summarizer: &'a S, config: &'a Config) -> Self {
        Self {
            platform,
            summarizer,
            config,
            stage: Cell::new(Stage::Idle),
        }
    }

    /// Last stage entered; `Idle` until `run` is called.
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    pub async fn run(&self) -> DigestResult<DigestReport> {
        self.enter(Stage::Authenticated);

        match self.run_stages().await {
            Ok(report) => {
                self.enter(Stage::Done);
                tracing::info!(
                    chats = report.chats,
                    messages = report.messages,
                    sent = report.sent,
                    "digest run finished"
                );
                Ok(report)
            }
            Err(error) => {
                let reached = self.stage();
                self.enter(Stage::Failed);
                tracing::error!(%error, ?reached, "digest run failed");
                Err(error)
            }
        }
    }

    async fn run_stages(&self) -> DigestResult<DigestReport> {
        let output_chat = self
            .platform
            .resolve_chat(&self.config.output_chat)
            .await
            .map_err(DigestError::platform)?;
        tracing::info!(output_chat = %self.config.output_chat, "output chat resolved");

        let folder = self.load_folder().await?;
        self.enter(Stage::FoldersLoaded);

        let chats = self.collect_unread_chats(&folder).await?;
        self.enter(Stage::DialogsCollected);

        let digest = self.summarize(&chats).await?;
        self.enter(Stage::Summarized);

        let sent = self.dispatch(&output_chat, &digest).await?;
        self.enter(Stage::Dispatched);

        Ok(DigestReport {
            chats: chats.len(),
            messages: chats.iter().map(|c| c.messages.len()).sum(),
            sent,
        })
    }

    async fn load_folder(&self) -> DigestResult<Folder> {
        let folders = self
            .platform
            .list_folders()
            .await
            .map_err(DigestError::platform)?;

        tracing::info!(
            folders = ?folders.iter().map(|f| (f.title.as_str(), f.id)).collect::<Vec<_>>(),
            "folders loaded"
        );

        let folder = folders
            .into_iter()
            .find(|f| f.id == self.config.folder_id)
            .ok_or(DigestError::FolderNotFound(self.config.folder_id))?;

        tracing::info!(
            folder_id = folder.id,
            title = %folder.title,
            "folder selected"
        );

        Ok(folder)
    }

    async fn collect_unread_chats(
        &self,
        folder: &Folder,
    ) -> DigestResult<Vec<UnreadChat<P::Chat>>> {
        let mut dialogs = self.platform.iter_dialogs();
        let mut unread_chats = Vec::new();

        while let Some(dialog) = dialogs
            .next_dialog()
            .await
            .map_err(DigestError::platform)?
        {
            if !folder.includes(dialog.chat_id) || dialog.unread_count == 0 {
                continue;
            }

            unread_chats.push(self.read_chat(dialog).await?);
        }

        if unread_chats.is_empty() {
            tracing::warn!(folder = %folder.title, "no unread messages in folder");
            return Err(DigestError::EmptyDigest(folder.title.clone()));
        }

        tracing::info!(
            chats = unread_chats.len(),
            "found chats with unread messages"
        );

        Ok(unread_chats)
    }

    async fn read_chat(&self, dialog: Dialog<P::Chat>) -> DigestResult<UnreadChat<P::Chat>> {
        let Dialog {
            chat_id,
            title,
            unread_count,
            chat,
        } = dialog;

        tracing::debug!(%chat_id, %title, unread_count, "reading chat");

        if unread_count >= MAX_MESSAGES_PER_CHAT {
            tracing::warn!(
                %title,
                unread_count,
                "too many unread messages, limiting to {MAX_MESSAGES_PER_CHAT}"
            );
        }
        let limit = unread_count.min(MAX_MESSAGES_PER_CHAT) as usize;

        let raw_messages = self
            .platform
            .get_messages(&chat, limit)
            .await
            .map_err(DigestError::platform)?;
        let entity = self
            .platform
            .get_entity(&chat)
            .await
            .map_err(DigestError::platform)?;

        let messages = raw_messages
            .into_iter()
            .take(limit)
            .filter_map(|raw| match process_message(raw, &entity) {
                Ok(message) => Some(message),
                Err(error) => {
                    tracing::warn!(%error, %title, "skipping message");
                    None
                }
            })
            .collect();

        Ok(UnreadChat {
            title,
            unread_count,
            messages,
            chat,
        })
    }

    async fn summarize(&self, chats: &[UnreadChat<P::Chat>]) -> DigestResult<String> {
        let prompt = build_prompt(SUMMARIZATION_PROMPT, chats);
        tracing::debug!(chats = chats.len(), "sending chats for summarization");

        Ok(self.summarizer.summarize(&prompt).await?)
    }

    /// Sends the digest, returns how many messages were posted.
    async fn dispatch(&self, chat: &P::Chat, digest: &str) -> DigestResult<usize> {
        let message = wrap_digest(digest);

        if message.chars().count() <= MESSAGE_LIMIT.get() {
            tracing::info!("sending digest as a single message");
            self.send(chat, &message).await?;
            return Ok(1);
        }

        tracing::info!("digest exceeds the message limit, splitting into parts");

        self.send(chat, DIGEST_HEADER).await?;

        let chunks = split_message_into_chunks(digest, MESSAGE_LIMIT);
        let total = chunks.len();

        for (index, chunk) in chunks.iter().enumerate() {
            let text = if index + 1 == total {
                Cow::Owned(sign_last_chunk(chunk))
            } else {
                Cow::Borrowed(chunk.as_str())
            };

            tracing::debug!(part = index + 1, total, "sending digest part");
            self.send(chat, &text).await?;
        }

        tracing::info!(parts = total, "digest sent in parts");

        Ok(total + 1)
    }

    fn enter(&self, next: Stage) {
        tracing::debug!(from = ?self.stage.get(), to = ?next, "digest stage");
        self.stage.set(next);
    }

    async fn send(&self, chat: &P::Chat, text: &str) -> DigestResult<()> {
        self.platform
            .send_message(chat, text, Formatting::Markdown)
            .await
            .map_err(DigestError::platform)
    }
}

pub(crate) fn process_message(
    raw: RawMessage,
    entity: &ChatEntity,
) -> Result<ChatMessage, MessageProcessingError> {
    let content = match raw.text {
        None => return Err(MessageProcessingError::ServiceMessage(raw.id)),
        Some(text) if text.trim().is_empty() => {
            return Err(MessageProcessingError::EmptyText(raw.id));
        }
        Some(text) => text,
    };

    Ok(ChatMessage {
        permalink: build_permalink(entity, raw.id),
        content,
        id: raw.id,
    })
}
