//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Config file text in the layout the service expects.
pub fn config_text(port: u16, version: &str) -> String {
    format!(
        "port: {port}\nversion: \"{version}\"\ndatabase:\n  host: localhost\n  name: app\n  port: 3306\n"
    )
}

/// Write `config.yaml` into `dir` and return its path.
pub fn write_config(dir: &Path, port: u16, version: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, config_text(port, version)).unwrap();
    path
}

/// A port that was free a moment ago.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("0.0.0.0:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// `GET /version` and return the decoded version string.
pub async fn get_version(client: &reqwest::Client, port: u16) -> String {
    let res = client
        .get(format!("http://127.0.0.1:{port}/version"))
        .send()
        .await
        .expect("service unreachable");
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    body["version"].as_str().expect("version must be a string").to_string()
}

/// Poll `GET /version` until it returns `expected` or ten seconds pass.
pub async fn wait_for_version(client: &reqwest::Client, port: u16, expected: &str) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let current = get_version(client, port).await;
        if current == expected {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "version stayed {current:?}, expected {expected:?}"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
