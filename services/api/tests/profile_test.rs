//! Tests for the profile and personalized digest endpoints

mod common;

use common::{create_test_server, sample_digest, signup};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Test: protected routes reject missing and unknown tokens
#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let ctx = create_test_server();
    ctx.write_digest(&sample_digest());

    for path in ["/api/profile", "/api/personalized-digest"] {
        let response = ctx.server.get(path).await;
        assert_eq!(response.status_code(), 401, "{path}");
        let body: Value = response.json();
        assert_eq!(body, json!({"success": false, "error": "Unauthorized"}));

        let response = ctx.server.get(path).authorization_bearer("forged_user_1").await;
        assert_eq!(response.status_code(), 401, "{path}");
    }

    let response = ctx
        .server
        .put("/api/profile")
        .json(&json!({"name": "Mallory"}))
        .await;
    assert_eq!(response.status_code(), 401);
}

/// Test: the profile reflects what signup stored
#[tokio::test]
async fn test_get_profile() {
    let ctx = create_test_server();
    let token = signup(&ctx, "me@example.com", "pw", &["Markets"]).await;

    let response = ctx
        .server
        .get("/api/profile")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "me@example.com");
    assert_eq!(body["user"]["name"], "Test Reader");
    assert_eq!(body["user"]["interests"], json!(["Markets"]));
    assert!(body["user"].get("password").is_none());
}

/// Test: updated interests round-trip through the profile
#[tokio::test]
async fn test_update_interests_round_trip() {
    let ctx = create_test_server();
    let token = signup(&ctx, "edit@example.com", "pw", &["Markets"]).await;

    let interests = json!(["Energy & Resources", "Policy & Regulation"]);
    let response = ctx
        .server
        .put("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({"interests": interests}))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["user"]["interests"], interests);
    assert_eq!(body["user"]["name"], "Test Reader");

    let body: Value = ctx
        .server
        .get("/api/profile")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["user"]["interests"], interests);

    // Persisted, not just cached.
    assert_eq!(ctx.users_on_disk()[0]["interests"], interests);
}

/// Test: a name-only update keeps interests, and blank names are ignored
#[tokio::test]
async fn test_update_name_merges() {
    let ctx = create_test_server();
    let token = signup(&ctx, "name@example.com", "pw", &["Markets"]).await;

    let body: Value = ctx
        .server
        .put("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({"name": "Renamed"}))
        .await
        .json();
    assert_eq!(body["user"]["name"], "Renamed");
    assert_eq!(body["user"]["interests"], json!(["Markets"]));

    let body: Value = ctx
        .server
        .put("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({"name": ""}))
        .await
        .json();
    assert_eq!(body["user"]["name"], "Renamed");
}

/// Test: a session whose user has vanished yields NotFound
#[tokio::test]
async fn test_deleted_user_is_not_found() {
    let ctx = create_test_server();
    ctx.write_digest(&sample_digest());
    let token = signup(&ctx, "gone@example.com", "pw", &[]).await;

    std::fs::write(ctx.users_path(), "[]").unwrap();

    for path in ["/api/profile", "/api/personalized-digest"] {
        let response = ctx.server.get(path).authorization_bearer(&token).await;
        assert_eq!(response.status_code(), 404, "{path}");
        let body: Value = response.json();
        assert_eq!(body, json!({"success": false, "error": "User not found"}));
    }

    let response = ctx
        .server
        .put("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({"name": "Ghost"}))
        .await;
    assert_eq!(response.status_code(), 404);
}

/// Test: no interests means the full digest
#[tokio::test]
async fn test_personalized_without_interests_is_everything() {
    let ctx = create_test_server();
    let digest = sample_digest();
    ctx.write_digest(&digest);
    let token = signup(&ctx, "all@example.com", "pw", &[]).await;

    let response = ctx
        .server
        .get("/api/personalized-digest")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["categories"], digest["categories"]);
    assert_eq!(body["data"]["total_items"], 4);
    assert_eq!(body["data"]["user_interests"], json!([]));
    assert_eq!(body["data"]["date"], "2025-01-02");
    assert_eq!(body["data"]["last_updated"], digest["last_updated"]);
}

/// Test: interests select exactly the matching categories and recount items
#[tokio::test]
async fn test_personalized_filters_by_interests() {
    let ctx = create_test_server();
    let digest = sample_digest();
    ctx.write_digest(&digest);
    let token = signup(&ctx, "some@example.com", "pw", &["Markets", "Sports"]).await;

    let body: Value = ctx
        .server
        .get("/api/personalized-digest")
        .authorization_bearer(&token)
        .await
        .json();
    let categories = body["data"]["categories"].as_object().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories["Markets"], digest["categories"]["Markets"]);
    assert_eq!(body["data"]["total_items"], 2);
    assert_eq!(body["data"]["user_interests"], json!(["Markets", "Sports"]));
}

/// Test: changing interests changes the personalized digest
#[tokio::test]
async fn test_personalized_follows_profile_updates() {
    let ctx = create_test_server();
    ctx.write_digest(&sample_digest());
    let token = signup(&ctx, "switch@example.com", "pw", &["Markets"]).await;

    ctx.server
        .put("/api/profile")
        .authorization_bearer(&token)
        .json(&json!({"interests": ["Policy & Regulation", "Space"]}))
        .await;

    let body: Value = ctx
        .server
        .get("/api/personalized-digest")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["data"]["total_items"], 2);
    assert!(body["data"]["categories"].get("Markets").is_none());
}

/// Test: personalization without a digest reports not available
#[tokio::test]
async fn test_personalized_without_digest() {
    let ctx = create_test_server();
    let token = signup(&ctx, "early@example.com", "pw", &[]).await;

    let response = ctx
        .server
        .get("/api/personalized-digest")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}
