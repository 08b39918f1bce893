use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    pub session_file: PathBuf,
    /// Two-step verification password, if the account has one
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub login_code: LoginCodeConfig,
}

#[derive(Clone, serde::Deserialize)]
pub struct LoginCodeConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LoginCodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_timeout_secs() -> u64 {
    300
}
