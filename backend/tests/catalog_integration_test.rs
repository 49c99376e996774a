//! Integration tests for the catalog endpoints and the role gate

mod common;

use axum::http::StatusCode;
use common::multipart_body;
use hookah_shared::Role;

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes";

fn product_fields(fabricator_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Dark Forest".to_string()),
        ("fabricatorId", fabricator_id.to_string()),
        ("description", "Berries and pine".to_string()),
    ]
}

async fn tobacco_count(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tobaccos")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_user_role_cannot_create_tobacco() {
    let app = common::TestApp::new().await;
    let account = app.seed_account(Role::User).await;
    let token = app.token_for(account.id);

    let before = tobacco_count(&app.pool).await;

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some(("photo.png", FAKE_PNG)));

    let (status, response) = app
        .send_multipart("POST", "/api/v1/tobaccos", &token, body)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], false);

    // Deny happened before any persistence write
    assert_eq!(tobacco_count(&app.pool).await, before);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_moderator_creates_and_reads_tobacco() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some(("photo.png", FAKE_PNG)));

    let (status, response) = app
        .send_multipart("POST", "/api/v1/tobaccos", &token, body)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = response["body"]["id"].as_str().unwrap().to_string();

    // Public read without a token
    let (status, body) = app.get(&format!("/api/v1/tobaccos/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["body"]["name"], "Dark Forest");
    assert!(body["body"]["photoUrl"]
        .as_str()
        .unwrap()
        .starts_with("uploads/tobaccos/"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_without_photo_is_forbidden() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let before = tobacco_count(&app.pool).await;

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, None);

    let (status, _) = app
        .send_multipart("POST", "/api/v1/tobaccos", &token, body)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(tobacco_count(&app.pool).await, before);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_satisfies_moderator_requirement() {
    let app = common::TestApp::new().await;
    let admin = app.seed_account(Role::Admin).await;
    let token = app.token_for(admin.id);

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some(("photo.jpg", FAKE_PNG)));

    let (status, _) = app
        .send_multipart("POST", "/api/v1/coals", &token, body)
        .await;

    assert_eq!(status, StatusCode::CREATED);
}

/// Create a tobacco as the given token's account and return (id, photoUrl)
async fn create_tobacco(app: &common::TestApp, token: &str, photo_name: &str) -> (String, String) {
    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some((photo_name, FAKE_PNG)));

    let (status, response) = app
        .send_multipart("POST", "/api/v1/tobaccos", token, body)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = response["body"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.get(&format!("/api/v1/tobaccos/{}", id)).await;
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let photo_url = body["body"]["photoUrl"].as_str().unwrap().to_string();

    (id, photo_url)
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_with_new_photo_unlinks_old_file() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let (id, old_url) = create_tobacco(&app, &token, "photo.png").await;
    let old_file = app.upload_disk_path(&old_url);
    assert!(tokio::fs::metadata(&old_file).await.is_ok());

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = [
        ("name", "Dark Forest Reserve"),
        ("fabricatorId", fabricator.as_str()),
        ("description", "Drier blend"),
    ];
    let body = multipart_body(&fields, Some(("replacement.jpg", FAKE_PNG)));

    let (status, response) = app
        .send_multipart("PUT", &format!("/api/v1/tobaccos/{}", id), &token, body)
        .await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["body"]["name"], "Dark Forest Reserve");
    let new_url = response["body"]["photoUrl"].as_str().unwrap().to_string();
    assert_ne!(new_url, old_url);
    assert!(new_url.ends_with(".jpg"));

    // Old file unlinked, new one on disk
    assert!(tokio::fs::metadata(&old_file).await.is_err());
    assert!(tokio::fs::metadata(app.upload_disk_path(&new_url)).await.is_ok());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_without_photo_keeps_existing_photo() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let (id, old_url) = create_tobacco(&app, &token, "photo.png").await;

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = [
        ("name", "Dark Forest Renamed"),
        ("fabricatorId", fabricator.as_str()),
        ("description", "Same photo"),
    ];
    let body = multipart_body(&fields, None);

    let (status, response) = app
        .send_multipart("PUT", &format!("/api/v1/tobaccos/{}", id), &token, body)
        .await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["body"]["name"], "Dark Forest Renamed");
    assert_eq!(response["body"]["photoUrl"].as_str().unwrap(), old_url);
    assert!(tokio::fs::metadata(app.upload_disk_path(&old_url)).await.is_ok());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_removes_row() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some(("photo.png", FAKE_PNG)));

    let (_, response) = app
        .send_multipart("POST", "/api/v1/tobaccos", &token, body)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let id = response["body"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send_multipart("DELETE", &format!("/api/v1/tobaccos/{}", id), &token, vec![])
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/v1/tobaccos/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_missing_tobacco_is_404() {
    let app = common::TestApp::new().await;

    let (status, response) = app
        .get(&format!("/api/v1/tobaccos/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_favorites_lookup_returns_favorited_products() {
    let app = common::TestApp::new().await;
    let moderator = app.seed_account(Role::Moderator).await;
    let token = app.token_for(moderator.id);

    let fabricator = uuid::Uuid::new_v4().to_string();
    let fields = product_fields(&fabricator);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let body = multipart_body(&fields, Some(("photo.png", FAKE_PNG)));

    let (_, response) = app
        .send_multipart("POST", "/api/v1/tobaccos", &token, body)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let tobacco_id = response["body"]["id"].as_str().unwrap();

    sqlx::query("INSERT INTO favorite_tobaccos (user_id, tobacco_id) VALUES ($1, $2)")
        .bind(moderator.id)
        .bind(uuid::Uuid::parse_str(tobacco_id).unwrap())
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app
        .get(&format!("/api/v1/users/{}/favorites/tobaccos", moderator.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let list = body["body"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_str().unwrap(), tobacco_id);
}
