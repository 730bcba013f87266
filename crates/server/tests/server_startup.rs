use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a config pointing the ticket file into `dir`
fn config_with_storage(port: u16, storage_path: &std::path::Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[storage]
path = "{}"
"#,
        port,
        storage_path.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_ticketdesk"))
        .env("TICKETDESK_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&config_with_storage(
        port,
        &temp_dir.path().join("tickets.json"),
    ));

    let mut server = spawn_server(config.path());
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_corrupted_ticket_file_fails_startup() {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("tickets.json");
    std::fs::write(&storage_path, "this is not json").unwrap();

    let config = write_config(&config_with_storage(port, &storage_path));
    let mut server = spawn_server(config.path());

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server should exit on corrupted ticket file")
        .expect("Failed to wait for server");
    assert!(!status.success());
}

#[tokio::test]
async fn test_invalid_config_fails_startup() {
    let config = write_config(
        r#"
[server]
port = 0
"#,
    );
    let mut server = spawn_server(config.path());

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server should exit on invalid config")
        .expect("Failed to wait for server");
    assert!(!status.success());
}

#[tokio::test]
async fn test_env_overrides_port() {
    let port = get_available_port();
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&config_with_storage(
        1, // overridden below
        &temp_dir.path().join("tickets.json"),
    ));

    let mut server = tokio::process::Command::new(env!("CARGO_BIN_EXE_ticketdesk"))
        .env("TICKETDESK_CONFIG", config.path())
        .env("TICKETDESK_SERVER_PORT", port.to_string())
        .env("RUST_LOG", "error")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    assert!(
        wait_for_server(port, 40).await,
        "Server did not honor TICKETDESK_SERVER_PORT"
    );

    server.kill().await.ok();
}
