mod config;
mod error;
mod login_code;
mod peer;
mod platform;

use std::sync::Arc;

pub use config::{Config, LoginCodeConfig};
pub use error::*;
pub use login_code::{LoginCodeServer, PendingLoginCode};
pub use platform::TelegramDialogs;

/// Source of the login code Telegram sends to the user's other sessions.
pub trait CodeProvider {
    fn login_code(&self) -> impl Future<Output = ClientResult<String>>;
}

pub struct TelegramSession {
    client: grammers_client::Client,
    api_hash: String,
    phone: String,
    password: Option<String>,
    handle: grammers_mtsender::SenderPoolHandle,
    runner: tokio::task::JoinHandle<()>,
}

impl TelegramSession {
    pub fn connect(config: &Config) -> ClientResult<Self> {
        let session = Arc::new(
            grammers_session::storages::SqliteSession::open(&config.session_file)
                .map_err(|error| ClientError::Session(error.to_string()))?,
        );
        let sender_pool = grammers_mtsender::SenderPool::new(Arc::clone(&session), config.api_id);
        let client = grammers_client::client::Client::new(&sender_pool);

        let grammers_mtsender::SenderPool {
            runner,
            updates: _updates,
            handle,
        } = sender_pool;

        let runner = tokio::spawn(async move {
            runner.run().await;
        });

        tracing::info!(session_file = %config.session_file.display(), "Telegram client started");

        Ok(TelegramSession {
            client,
            api_hash: config.api_hash.clone(),
            phone: config.phone.clone(),
            password: config.password.clone(),
            handle,
            runner,
        })
    }

    pub async fn authorize(&self, code_provider: &impl CodeProvider) -> ClientResult<()> {
        tracing::info!("Checking authorization status...");

        if self.client.is_authorized().await? {
            self.log_credentials().await?;
            return Ok(());
        }

        tracing::info!(
            phone = %self.phone,
            "Not authorized, Telegram sends the login code to the authorized sessions"
        );

        let token = self
            .client
            .request_login_code(&self.phone, &self.api_hash)
            .await?;

        let code = code_provider.login_code().await?;

        match self.client.sign_in(&token, code.trim()).await {
            Ok(_user) => {
                tracing::info!("Signed in successfully!");
            }
            Err(grammers_client::SignInError::PasswordRequired(password_token)) => {
                let password = self
                    .password
                    .as_deref()
                    .ok_or(ClientError::PasswordRequired)?;
                self.client
                    .check_password(password_token, password.trim())
                    .await?;
                tracing::info!("Signed in with 2FA!");
            }
            Err(e) => return Err(e.into()),
        }

        self.log_credentials().await?;

        Ok(())
    }

    async fn log_credentials(&self) -> ClientResult<()> {
        let me = self.client.get_me().await?;
        tracing::info!(
            "Logged in as: {} (ID: {})",
            me.username().unwrap_or("N/A"),
            me.bare_id()
        );
        Ok(())
    }

    /// Stops the sender pool. Call on every exit path once connected.
    pub async fn disconnect(self) {
        self.handle.quit();

        if let Err(error) = self.runner.await {
            tracing::error!(%error, "sender pool runner failed");
        }

        tracing::info!("Telegram client disconnected");
    }

    async fn resolve_peer(&self, handle: &str) -> ClientResult<grammers_client::types::Peer> {
        let resolved = self.client.resolve_username(handle).await?;

        match resolved {
            Some(peer) => Ok(peer),
            None => Err(ClientError::NotFound(format!("@{handle}"))),
        }
    }
}

#[cfg(test)]
mod tests;
