mod config;

use std::process::ExitCode;

use anyhow::Context;
use tgdigest_ai::GeminiClient;
use tgdigest_client::{LoginCodeServer, TelegramSession};
use tgdigest_core::DigestPipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = config::Config::new().context("Error parsing config")?;

    tracing::info!(
        folder_id = config.digest.folder_id,
        output_chat = %config.digest.output_chat,
        model = %config.ai.model,
        "starting digest"
    );

    let session = TelegramSession::connect(&config.telegram)?;

    // disconnect no matter how the run ends
    let result = digest(&session, &config).await;
    session.disconnect().await;

    result
}

async fn digest(session: &TelegramSession, config: &config::Config) -> anyhow::Result<()> {
    let code_provider = LoginCodeServer::new(&config.telegram.login_code);
    session
        .authorize(&code_provider)
        .await
        .context("Telegram authorization failed")?;

    let summarizer = GeminiClient::new(&config.ai);

    DigestPipeline::new(session, &summarizer, &config.digest)
        .run()
        .await?;

    tracing::info!("digest successfully finished");

    Ok(())
}
