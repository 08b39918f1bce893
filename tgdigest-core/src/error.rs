#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("Folder with ID {0} not found")]
    FolderNotFound(i32),

    #[error("No unread messages in folder \"{0}\"")]
    EmptyDigest(String),

    #[error("Chat platform error: {0}")]
    Platform(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("AI error: {0}")]
    AI(#[from] tgdigest_ai::TgdigestAiError),
}

impl DigestError {
    pub(crate) fn platform<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DigestError::Platform(Box::new(error))
    }
}

/// A single message that can't be put into the prompt. Never aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum MessageProcessingError {
    #[error("message {0} is a service message")]
    ServiceMessage(i32),

    #[error("message {0} has no text, probably a media file")]
    EmptyText(i32),
}

pub type DigestResult<T> = Result<T, DigestError>;
