use std::fmt;

/// Upper bound of messages fetched per chat, keeps the prompt small.
pub const MAX_MESSAGES_PER_CHAT: u32 = 20;

const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

/// Chat id in the "marked" form Telegram clients print: users are positive,
/// basic groups are `-<id>`, channels and supergroups are `-100<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(i64);

impl ChatId {
    pub const fn user(bare_id: i64) -> Self {
        Self(bare_id)
    }

    pub const fn group(bare_id: i64) -> Self {
        Self(-bare_id)
    }

    pub const fn channel(bare_id: i64) -> Self {
        Self(-(CHANNEL_ID_OFFSET + bare_id))
    }

    pub const fn from_marked(marked: i64) -> Self {
        Self(marked)
    }

    pub const fn marked(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Folder {
    pub id: i32,
    pub title: String,
    pub included_chats: Vec<ChatId>,
}

impl Folder {
    pub fn includes(&self, chat_id: ChatId) -> bool {
        self.included_chats.contains(&chat_id)
    }
}

/// One entry of the dialog list. `C` is the platform handle used for
/// follow-up requests.
#[derive(Debug, Clone)]
pub struct Dialog<C> {
    pub chat_id: ChatId,
    pub title: String,
    pub unread_count: u32,
    pub chat: C,
}

#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: i32,
    /// `None` for service messages (joins, pins and the like)
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatEntity {
    pub id: Option<ChatId>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: String,
    pub id: i32,
    pub permalink: String,
}

#[derive(Debug, Clone)]
pub struct UnreadChat<C> {
    pub title: String,
    pub unread_count: u32,
    pub messages: Vec<ChatMessage>,
    pub chat: C,
}
