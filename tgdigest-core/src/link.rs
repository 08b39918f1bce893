use crate::models::{ChatEntity, ChatId};

/// What a chat has to expose to get message links.
pub trait LinkTarget {
    fn username(&self) -> Option<&str>;
    fn chat_id(&self) -> Option<ChatId>;
}

impl LinkTarget for ChatEntity {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn chat_id(&self) -> Option<ChatId> {
        self.id
    }
}

/// Builds a `t.me` link to a message.
///
/// Public chats are linked by username. Private chats use the `/c/` form
/// with the marked id stripped of its `-100` (channel) or `-` (group)
/// prefix. When the chat id is unknown a plain `Message ID: <id>` reference
/// is returned instead, so a message is never dropped for lack of a link.
pub fn build_permalink(target: &impl LinkTarget, message_id: i32) -> String {
    if let Some(username) = target.username().filter(|u| !u.is_empty()) {
        return format!("https://t.me/{username}/{message_id}");
    }

    let Some(chat_id) = target.chat_id() else {
        tracing::warn!(%message_id, "chat id unavailable, falling back to plain reference");
        return format!("Message ID: {message_id}");
    };

    let marked = chat_id.to_string();
    let link_id = marked
        .strip_prefix("-100")
        .or_else(|| marked.strip_prefix('-'))
        .unwrap_or(&marked);

    format!("https://t.me/c/{link_id}/{message_id}")
}
