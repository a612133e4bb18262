#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use recipes_api::config::{AppConfig, StorageBackend};
use recipes_api::database::MemoryDatabase;
use recipes_api::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub upload_dir: PathBuf,
}

impl TestServer {
    /// Start the full router on a free port, backed by a fresh memory store
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let upload_dir = std::env::temp_dir().join(format!("recipes-api-test-{}", uuid::Uuid::new_v4().simple()));

        let mut config = AppConfig::development();
        config.server.port = port;
        config.database.backend = StorageBackend::Memory;
        config.uploads.dir = upload_dir.clone();
        // Cheap hashing keeps the suite fast
        config.password.memory_cost_kib = 1024;
        config.password.time_cost = 1;
        customize(&mut config);

        let state = AppState::new(config, Arc::new(MemoryDatabase::new()))?;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self { port, base_url, upload_dir };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register `username` with a cookie-keeping client, which is returned logged in
    pub async fn register(&self, username: &str, password: &str) -> Result<(Client, Value)> {
        let client = session_client()?;
        let res = client
            .post(self.url("/api/users"))
            .json(&json!({
                "firstName": "Test",
                "lastName": "Cook",
                "username": username,
                "password": password,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "registration failed: {}", res.status());
        let body: Value = res.json().await?;
        Ok((client, body["user"].clone()))
    }

    pub async fn create_cook(&self, client: &Client, name: &str) -> Result<Value> {
        let res = client
            .post(self.url("/api/cooks"))
            .json(&json!({ "name": name, "desc": "desc", "path": "/images/cook" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create cook failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn create_recipe(&self, client: &Client, cook_id: &str, title: &str) -> Result<Value> {
        let res = client
            .post(self.url(&format!("/api/cooks/{}/recipes", cook_id)))
            .json(&json!({ "title": title, "desc": "tasty", "path": "/images/recipe" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create recipe failed: {}", res.status());
        Ok(res.json().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// A client that stores and replays cookies like a browser
pub fn session_client() -> Result<Client> {
    Ok(Client::builder().cookie_store(true).build()?)
}
