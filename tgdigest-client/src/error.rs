use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Grammers session storage error: {0}")]
    Session(String),

    #[error("Grammers invocation error: {0}")]
    Invocation(#[from] grammers_mtsender::InvocationError),

    #[error("Sign in error: {0}")]
    SignIn(Box<grammers_client::SignInError>),

    #[error("2FA is enabled but no password is configured")]
    PasswordRequired,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chat not found: {0}")]
    NotFound(String),

    #[error("Login code was not received within {} seconds", .0.as_secs())]
    LoginCodeTimeout(Duration),
}

impl From<grammers_client::SignInError> for ClientError {
    fn from(err: grammers_client::SignInError) -> Self {
        ClientError::SignIn(Box::new(err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
