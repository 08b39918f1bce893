#[derive(Debug, thiserror::Error)]
pub enum TgdigestAiError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Prompt blocked by the model: {0}")]
    Blocked(String),

    #[error("Model stopped without text: {0}")]
    Stopped(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

pub type TgdigestAiResult<T> = Result<T, TgdigestAiError>;
