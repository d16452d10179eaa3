#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use user_management_api::{
    auth::SigningAlgorithm,
    config::{AppConfig, KeyPairConfig, KeyPem},
    database::MemoryStore,
    router,
    services::user_service,
    AppState,
};

const ACCESS_PRIVATE: &str = include_str!("../../fixtures/keys/access_ed25519.pem");
const ACCESS_PUBLIC: &str = include_str!("../../fixtures/keys/access_ed25519.pub.pem");
const REFRESH_PRIVATE: &str = include_str!("../../fixtures/keys/refresh_ed25519.pem");
const REFRESH_PUBLIC: &str = include_str!("../../fixtures/keys/refresh_ed25519.pub.pem");

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "administrator";

/// An application instance on its own port, backed by a fresh in-memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

fn pair(private: &str, public: &str) -> KeyPairConfig {
    KeyPairConfig {
        private_key: KeyPem(private.to_string()),
        public_key: KeyPem(public.to_string()),
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development().with_keys(
        SigningAlgorithm::EdDsa,
        pair(ACCESS_PRIVATE, ACCESS_PUBLIC),
        pair(REFRESH_PRIVATE, REFRESH_PUBLIC),
    );
    config.auth.bcrypt_cost = 4;
    config
}

impl TestServer {
    async fn start(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        // Cookies are issued for the "localhost" domain
        let base_url = format!("http://localhost:{}", port);

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone(), store)?;
        user_service::ensure_administrator(&state, ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed administrator: {}", e))?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, state };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
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
}

pub async fn start_server() -> Result<TestServer> {
    TestServer::start(test_config()).await
}

pub async fn start_server_with(config: AppConfig) -> Result<TestServer> {
    TestServer::start(config).await
}

/// Client that keeps cookies between requests, like a browser would.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client builds")
}

/// Register a member through the public endpoint and return its id.
pub async fn register(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/user/create"))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": password,
            "passwordConfirm": password,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register returned {}", res.status());
    let body: Value = res.json().await?;
    body["data"]["user"]["id"]
        .as_str()
        .map(str::to_string)
        .context("register response has no user id")
}

/// Log in with `client` and return the access token from the body.
pub async fn login(client: &reqwest::Client, server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = client
        .post(server.url("/user/auth"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login returned {}", res.status());
    let body: Value = res.json().await?;
    body["data"]["access_token"]
        .as_str()
        .map(str::to_string)
        .context("login response has no access token")
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(res: &reqwest::Response) -> Vec<String> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn find_cookie<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    cookies.iter().find(|c| c.starts_with(&format!("{}=", name)))
}
