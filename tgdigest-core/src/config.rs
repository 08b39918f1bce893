#[derive(Clone, serde::Deserialize)]
pub struct Config {
    /// Telegram folder (dialog filter) whose chats are summarized
    pub folder_id: i32,
    /// Where the digest is posted: `me`, a username or a marked chat id
    pub output_chat: String,
}
