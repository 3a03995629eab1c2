//! Common test utilities for API integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use axum_test::TestServer;
use news_api_lib::adapters::{InMemorySessionStore, JsonDigestStore, JsonUserStore};
use news_api_lib::config::Config;
use news_api_lib::web::state::decoy_hash;
use news_api_lib::web::{build_router, AppState};
use news_digest_core::RefreshPolicy;
use serde_json::{json, Value};
use tempfile::TempDir;
use tracing::Level;

/// A running test server over a throwaway data directory.
pub struct TestContext {
    pub server: TestServer,
    pub sessions: Arc<InMemorySessionStore>,
    pub dir: TempDir,
}

impl TestContext {
    pub fn digest_path(&self) -> PathBuf {
        self.dir.path().join("latest_digest.json")
    }

    pub fn status_path(&self) -> PathBuf {
        self.dir.path().join("service_status.json")
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.path().join("users.json")
    }

    /// Writes the digest document the pipeline would produce.
    pub fn write_digest(&self, digest: &Value) {
        std::fs::write(self.digest_path(), serde_json::to_vec_pretty(digest).unwrap()).unwrap();
    }

    pub fn write_status(&self, status: &Value) {
        std::fs::write(self.status_path(), serde_json::to_vec_pretty(status).unwrap()).unwrap();
    }

    pub fn users_on_disk(&self) -> Value {
        serde_json::from_slice(&std::fs::read(self.users_path()).unwrap()).unwrap()
    }
}

/// A hasher with minimal cost so tests stay fast.
fn cheap_hasher() -> Argon2<'static> {
    Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(256, 1, 1, None).unwrap(),
    )
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: Level::DEBUG,
        digest_path: dir.path().join("latest_digest.json"),
        status_path: dir.path().join("service_status.json"),
        users_path: dir.path().join("users.json"),
        cors_origin: None,
        static_dir: None,
        refresh_policy: RefreshPolicy::default(),
    }
}

/// Create a test server with an empty data directory
pub fn create_test_server() -> TestContext {
    create_test_server_with(|_| {})
}

/// Create a test server, adjusting the config before the router is built
pub fn create_test_server_with(adjust: impl FnOnce(&mut Config)) -> TestContext {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(&dir);
    adjust(&mut config);
    let config = Arc::new(config);

    let sessions = Arc::new(InMemorySessionStore::new());
    let hasher = cheap_hasher();
    let state = AppState {
        digests: Arc::new(JsonDigestStore::new(
            config.digest_path.clone(),
            config.status_path.clone(),
        )),
        users: Arc::new(JsonUserStore::new(config.users_path.clone())),
        sessions: sessions.clone(),
        config,
        decoy_hash: decoy_hash(&hasher).expect("Failed to build decoy hash"),
        hasher,
    };

    let server =
        TestServer::new(build_router(Arc::new(state))).expect("Failed to create test server");
    TestContext {
        server,
        sessions,
        dir,
    }
}

/// One article as the pipeline writes it.
fn article(title: &str, link: &str, source: &str, published: Option<&str>) -> Value {
    let mut article = json!({
        "title": title,
        "link": link,
        "source": source,
        "one_liner": format!("{title}."),
        "bullets": ["First point", "Second point"],
        "labels": ["markets"],
        "auto_tags": {"companies": ["HDFC"], "sectors": ["Banking"], "financial_terms": [], "entities": []}
    });
    if let Some(published) = published {
        article["published"] = json!(published);
    }
    article
}

/// A digest with three categories, one of them missing from the color table.
/// The "Space" story shares its link with a "Markets" story.
pub fn sample_digest() -> Value {
    json!({
        "date": "2025-01-02",
        "last_updated": "2025-01-02T08:05:00.123456",
        "total_items": 4,
        "feed_summary": {"feeds_ok": 5, "feeds_failed": 1},
        "categories": {
            "Markets": [
                article("Sensex climbs", "https://news.example/sensex", "Example Times", Some("2025-01-02T07:00:00")),
                article("Rupee steady", "https://news.example/rupee", "Example Times", Some("2025-01-01T18:00:00"))
            ],
            "Policy & Regulation": [
                article("New disclosure norms", "https://news.example/norms", "Regulator Wire", Some("2025-01-02T09:30:00"))
            ],
            "Space": [
                article("Launch scheduled", "https://news.example/sensex", "Orbit Daily", None)
            ]
        }
    })
}

/// Sign up a user and return the session token
pub async fn signup(ctx: &TestContext, email: &str, password: &str, interests: &[&str]) -> String {
    let response = ctx
        .server
        .post("/api/signup")
        .json(&json!({
            "email": email,
            "password": password,
            "name": "Test Reader",
            "interests": interests,
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    body["token"].as_str().expect("No token in signup response").to_string()
}
