//! Operations the digest needs from a chat platform.

use crate::models::{ChatEntity, Dialog, Folder, RawMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatting {
    Plain,
    Markdown,
}

/// Lazy, single-pass walk over the dialog list.
pub trait DialogCursor {
    type Chat;
    type Error;

    fn next_dialog(
        &mut self,
    ) -> impl Future<Output = Result<Option<Dialog<Self::Chat>>, Self::Error>>;
}

pub trait ChatPlatform {
    type Chat;
    type Error: std::error::Error + Send + Sync + 'static;
    type Dialogs: DialogCursor<Chat = Self::Chat, Error = Self::Error>;

    /// Finds a chat by `me`, username or marked id.
    fn resolve_chat(
        &self,
        identity: &str,
    ) -> impl Future<Output = Result<Self::Chat, Self::Error>>;

    fn list_folders(&self) -> impl Future<Output = Result<Vec<Folder>, Self::Error>>;

    fn iter_dialogs(&self) -> Self::Dialogs;

    /// Most recent messages first.
    fn get_messages(
        &self,
        chat: &Self::Chat,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawMessage>, Self::Error>>;

    fn get_entity(
        &self,
        chat: &Self::Chat,
    ) -> impl Future<Output = Result<ChatEntity, Self::Error>>;

    fn send_message(
        &self,
        chat: &Self::Chat,
        text: &str,
        formatting: Formatting,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}
