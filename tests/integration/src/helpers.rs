//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use memex_api::{create_app, create_app_state};
use memex_common::{AppConfig, JwtTokenVerifier, VerifiedIdentity};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Secret shared by the test server and [`TestServer::token`]
pub const TEST_TOKEN_SECRET: &str = "integration-test-secret";

/// Upload cap for test servers, in megabytes
pub const TEST_MAX_FILE_SIZE_MB: u32 = 1;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: PathBuf,
    verifier: JwtTokenVerifier,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server backed by the in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_vars(&[]).await
    }

    /// Start a test server, overriding individual configuration variables
    pub async fn start_with_vars(overrides: &[(&str, &str)]) -> Result<Self> {
        let upload_dir = std::env::temp_dir().join(format!("memex-it-{}", uuid::Uuid::new_v4()));
        let config = test_config(&upload_dir, overrides)?;
        let verifier = JwtTokenVerifier::from_config(&config.auth);

        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            upload_dir,
            verifier,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Mint a one-hour token for a plain user
    pub fn token(&self, uid: &str) -> String {
        self.token_for(&test_identity(uid))
    }

    /// Mint a one-hour token carrying the admin claim
    pub fn admin_token(&self, uid: &str) -> String {
        self.token_for(&test_identity(uid).with_admin(true))
    }

    pub fn token_for(&self, identity: &VerifiedIdentity) -> String {
        self.verifier
            .issue(identity, chrono::Duration::hours(1))
            .expect("Failed to issue test token")
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with JSON body and no token
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).json(body).send().await?)
    }

    /// Make a bodyless POST request with auth token
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }

    /// POST raw bytes with a content type
    pub async fn post_bytes_auth(&self, path: &str, token: &str, content_type: &str, bytes: Vec<u8>) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).bearer_auth(token).json(body).send().await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Identity used for minted tokens: `{uid}@example.com`, named after the uid
pub fn test_identity(uid: &str) -> VerifiedIdentity {
    VerifiedIdentity::new(uid)
        .with_email(format!("{uid}@example.com"))
        .with_name(format!("Tester {uid}"))
}

/// Create a test configuration
///
/// No `DATABASE_URL`, so the server runs on the in-memory store. The rate
/// limit is generous enough that tests never trip it.
pub fn test_config(upload_dir: &std::path::Path, overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("API_PORT".to_string(), "0".to_string()),
        ("AUTH_TOKEN_SECRET".to_string(), TEST_TOKEN_SECRET.to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND".to_string(), "1000".to_string()),
        ("RATE_LIMIT_BURST".to_string(), "1000".to_string()),
        ("UPLOAD_DIR".to_string(), upload_dir.display().to_string()),
        ("MAX_FILE_SIZE_MB".to_string(), TEST_MAX_FILE_SIZE_MB.to_string()),
        ("VOTE_MAX_ATTEMPTS".to_string(), "50".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|name| vars.get(name).cloned()).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(())
}

/// Assert an error status and return the `error` message of the body
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("error body without message: {body}"))
}
