use std::time::Duration;

use crate::{ClientError, LoginCodeConfig, LoginCodeServer};

fn server(timeout_secs: u64) -> LoginCodeServer {
    LoginCodeServer::new(&LoginCodeConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        timeout_secs,
    })
}

#[tokio::test]
async fn test_login_code_received() {
    let pending = server(10).bind().await.unwrap();
    let addr = pending.local_addr().unwrap();
    let waiter = tokio::spawn(pending.wait());

    let response = reqwest::get(format!("http://{addr}/?telegram_auth_code=12345"))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "12345");
    assert_eq!(waiter.await.unwrap().unwrap(), "12345");
}

#[tokio::test]
async fn test_login_code_missing_parameter_keeps_waiting() {
    let pending = server(10).bind().await.unwrap();
    let addr = pending.local_addr().unwrap();
    let waiter = tokio::spawn(pending.wait());

    let response = reqwest::get(format!("http://{addr}/?other=1")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = reqwest::get(format!("http://{addr}/?telegram_auth_code=")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(!waiter.is_finished());

    let response = reqwest::get(format!("http://{addr}/?telegram_auth_code=%2054321%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(waiter.await.unwrap().unwrap(), "54321");
}

#[tokio::test]
async fn test_login_code_timeout() {
    let pending = server(1).bind().await.unwrap();

    let result = pending.wait().await;

    assert!(matches!(
        result,
        Err(ClientError::LoginCodeTimeout(timeout)) if timeout == Duration::from_secs(1)
    ));
}
