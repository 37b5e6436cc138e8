mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use wallet_reputation::{
    api::{router, AppState},
    models::{IssuedBadge, ReputationError},
    Settings,
};

fn app(accounts: MockAccounts, publisher: MockPublisher, registry: MockRegistry) -> axum::Router {
    router(AppState::new(
        service_with(accounts, publisher, registry),
        Settings::default(),
    ))
}

fn idle_app() -> axum::Router {
    app(accounts_with(0), MockPublisher::new(), MockRegistry::new())
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn veteran_payload() -> Value {
    json!({
        "category": "Veteran",
        "score": 87,
        "message": "Based on 321 transactions, this address is categorized as a Veteran.",
        "rationale": "",
        "details": {"address": RECIPIENT, "transaction_count": 321, "balance": 1.5}
    })
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = idle_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["minting_enabled"], true);
}

#[tokio::test]
async fn test_analyze_requires_address() {
    let (status, body) = post_json(idle_app(), "/analyze", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Address is required");

    let (status, _) = post_json(idle_app(), "/analyze", json!({"address": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_returns_result_with_preview() {
    let app = app(accounts_with(44), MockPublisher::new(), MockRegistry::new());
    let (status, body) = post_json(app, "/analyze", json!({"address": RECIPIENT_LOWER})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["category"], "Explorer");
    assert_eq!(body["data"]["score"], 46);
    assert_eq!(body["data"]["details"]["address"], RECIPIENT);
    assert!(body["data"]["badge_svg_preview"]
        .as_str()
        .unwrap()
        .contains(">E</text>"));
}

#[tokio::test]
async fn test_analyze_invalid_address_is_error_record() {
    let (status, body) = post_json(idle_app(), "/analyze", json!({"address": "0x123"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["category"], "Error");
    assert_eq!(body["data"]["score"], 0);
    assert_eq!(body["data"]["message"], "Invalid address format: 0x123");
    assert!(body["data"].get("badge_svg_preview").is_none());
}

#[tokio::test]
async fn test_check_badge() {
    let mut registry = MockRegistry::new();
    registry.expect_has_badge().returning(|_| Ok(true));

    let app = app(accounts_with(0), MockPublisher::new(), registry);
    let (status, body) = post_json(app, "/check_badge", json!({"address": RECIPIENT})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "has_badge": true}));

    let (status, body) = post_json(idle_app(), "/check_badge", json!({"address": "nope"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid address format: nope");
}

#[tokio::test]
async fn test_check_badge_upstream_failure_is_generic() {
    let mut registry = MockRegistry::new();
    registry.expect_has_badge().returning(|_| {
        Err(ReputationError::RpcError {
            operation: "hasBadge".to_string(),
            message: "node at 10.1.2.3 unreachable".to_string(),
        })
    });

    let app = app(accounts_with(0), MockPublisher::new(), registry);
    let (status, body) = post_json(app, "/check_badge", json!({"address": RECIPIENT})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().contains("10.1.2.3"));
}

#[tokio::test]
async fn test_mint_requires_address_and_data() {
    let (status, body) = post_json(idle_app(), "/mint", json!({"address": RECIPIENT})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Address and reputation data are required");
}

#[tokio::test]
async fn test_mint_rejects_error_record() {
    let payload = json!({"category": "Error", "score": 0, "message": "x", "rationale": "", "details": {}});
    let (status, body) = post_json(
        idle_app(),
        "/mint",
        json!({"address": RECIPIENT, "reputation_data": payload}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid reputation data"));
}

#[tokio::test]
async fn test_mint_success() {
    let mut publisher = MockPublisher::new();
    publisher.expect_publish().returning(|_| Ok("ipfs://cid".to_string()));
    let mut registry = MockRegistry::new();
    registry.expect_has_badge().returning(|_| Ok(false));
    registry.expect_issue().returning(|_, _| {
        Ok(IssuedBadge {
            tx_hash: "0xabc".to_string(),
            token_id: Some(3),
        })
    });

    let app = app(accounts_with(0), publisher, registry);
    let (status, body) = post_json(
        app,
        "/mint",
        json!({"address": RECIPIENT, "reputation_data": veteran_payload()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["tx_hash"], "0xabc");
    assert_eq!(body["tokenId"], 3);
}

#[tokio::test]
async fn test_mint_already_issued_is_client_error() {
    let mut registry = MockRegistry::new();
    registry.expect_has_badge().returning(|_| Ok(true));
    registry.expect_issue().times(0);

    let app = app(accounts_with(0), MockPublisher::new(), registry);
    let (status, body) = post_json(
        app,
        "/mint",
        json!({"address": RECIPIENT, "reputation_data": veteran_payload()}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Recipient already has a badge.");
}

#[tokio::test]
async fn test_mint_publish_failure_is_server_error() {
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .returning(|_| Err(ReputationError::PublishFailure("bad jwt".to_string())));
    let mut registry = MockRegistry::new();
    registry.expect_has_badge().returning(|_| Ok(false));

    let app = app(accounts_with(0), publisher, registry);
    let (status, body) = post_json(
        app,
        "/mint",
        json!({"address": RECIPIENT, "reputation_data": veteran_payload()}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to upload metadata to IPFS.");
}

#[tokio::test]
async fn test_badge_svg_route() {
    let request = Request::builder().uri("/badge/legend.svg").body(Body::empty()).unwrap();
    let response = idle_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let svg = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(svg.contains(">L</text>"));
    assert!(svg.contains("#FFC107"));
}
