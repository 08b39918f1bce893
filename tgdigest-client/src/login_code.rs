use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::{ClientError, ClientResult, CodeProvider, LoginCodeConfig};

pub(crate) const CODE_PARAM: &str = "telegram_auth_code";

/// Receives the login code over HTTP: `GET /?telegram_auth_code=12345`.
pub struct LoginCodeServer {
    listen_addr: SocketAddr,
    timeout: Duration,
}

/// A bound listener waiting for exactly one login code.
pub struct PendingLoginCode {
    listener: TcpListener,
    timeout: Duration,
}

#[derive(Clone)]
struct CallbackState {
    code_tx: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

impl LoginCodeServer {
    pub fn new(config: &LoginCodeConfig) -> Self {
        Self {
            listen_addr: config.listen_addr,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub async fn bind(&self) -> ClientResult<PendingLoginCode> {
        let listener = TcpListener::bind(self.listen_addr).await?;

        Ok(PendingLoginCode {
            listener,
            timeout: self.timeout,
        })
    }
}

impl CodeProvider for LoginCodeServer {
    async fn login_code(&self) -> ClientResult<String> {
        let pending = self.bind().await?;

        tracing::info!(
            addr = %pending.local_addr()?,
            timeout_secs = self.timeout.as_secs(),
            "waiting for the login code, send it as GET /?{CODE_PARAM}=xxxxx (the host port may differ in a container)"
        );

        pending.wait().await
    }
}

impl PendingLoginCode {
    pub fn local_addr(&self) -> ClientResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn wait(self) -> ClientResult<String> {
        let PendingLoginCode { listener, timeout } = self;

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = CallbackState {
            code_tx: Arc::new(Mutex::new(Some(code_tx))),
        };
        let app = axum::Router::new()
            .route("/", get(receive_code))
            .with_state(state);

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let received = tokio::time::timeout(timeout, code_rx).await;

        let _ = shutdown_tx.send(());
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(%error, "login code listener failed"),
            Err(error) => tracing::warn!(%error, "login code listener task failed"),
        }

        match received {
            Ok(Ok(code)) => {
                tracing::info!("login code received");
                Ok(code)
            }
            _ => Err(ClientError::LoginCodeTimeout(timeout)),
        }
    }
}

async fn receive_code(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let code = params
        .get(CODE_PARAM)
        .map(|c| c.trim())
        .unwrap_or_default();

    if code.is_empty() {
        tracing::warn!("login code request without {CODE_PARAM}");
        return (
            StatusCode::BAD_REQUEST,
            format!("Missing {CODE_PARAM} parameter"),
        );
    }

    let code_tx = state
        .code_tx
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();

    match code_tx {
        Some(code_tx) => {
            let _ = code_tx.send(code.to_string());
            (StatusCode::OK, code.to_string())
        }
        None => (
            StatusCode::CONFLICT,
            "Login code already received".to_string(),
        ),
    }
}
