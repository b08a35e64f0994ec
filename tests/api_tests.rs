//! End-to-end tests of the HTTP surface over the in-memory store

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use tower::ServiceExt;

use graso_server::auth::{encode_stellar_address, TokenIssuer};
use graso_server::config::{Config, Environment};
use graso_server::routes::create_router;
use graso_server::state::AppState;
use graso_server::store::MemoryStore;

const SECRET: &str = "integration-secret";
const BASE_URL: &str = "http://localhost:8000";
const BOUNDARY: &str = "graso-test-boundary";

// ============================================================================
// Helpers
// ============================================================================

struct TestApp {
    router: Router,
    _uploads: tempfile::TempDir,
}

fn test_config(upload_dir: &Path) -> Config {
    Config {
        database_url: String::new(),
        environment: Environment::Development,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        db_max_connections: 1,
        cors_allowed_origins: None,
        log_level: "info".to_string(),
        jwt_secret: SECRET.to_string(),
        access_token_ttl_seconds: 1800,
        public_base_url: BASE_URL.to_string(),
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        max_upload_bytes: 64 * 1024,
        rotate_nonce_on_verify: false,
    }
}

fn spawn_app() -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());
    let state = AppState::new(Arc::new(MemoryStore::new()), &config);

    TestApp {
        router: create_router(state, &config),
        _uploads: uploads,
    }
}

struct Wallet {
    key: SigningKey,
    address: String,
}

impl Wallet {
    fn generate() -> Self {
        let key = SigningKey::generate(&mut OsRng);
        let address = encode_stellar_address(&key.verifying_key());
        Self { key, address }
    }

    fn sign(&self, nonce: &str) -> String {
        STANDARD.encode(self.key.sign(nonce.as_bytes()).to_bytes())
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn request_nonce(app: &TestApp, wallet: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/generate_nonce?wallet_address={}", wallet))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn submit_signature(
    app: &TestApp,
    wallet: &str,
    nonce: &str,
    signature: &str,
) -> (StatusCode, Value) {
    let body = json!({
        "wallet_address": wallet,
        "nonce": nonce,
        "signature": signature,
    });
    let request = Request::builder()
        .method("POST")
        .uri("/verify_signature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Run the whole handshake and return the access token
async fn login(app: &TestApp, wallet: &Wallet) -> String {
    let (status, body) = request_nonce(app, &wallet.address).await;
    assert_eq!(status, StatusCode::OK);
    let nonce = body["nonce"].as_str().unwrap().to_string();

    let (status, body) = submit_signature(app, &wallet.address, &nonce, &wallet.sign(&nonce)).await;
    assert_eq!(status, StatusCode::OK, "verify failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn profile_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("email", "ada@example.com"),
        ("description", "Collector of fine lofts"),
        ("occupation", "Engineer"),
        ("phoneNumber", "+44 20 7946 0000"),
        ("website", "https://ada.example.com"),
    ]
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_generate_nonce_is_idempotent() {
    let app = spawn_app();
    let wallet = Wallet::generate();

    let (status, first) = request_nonce(&app, &wallet.address).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = request_nonce(&app, &wallet.address.to_lowercase()).await;

    assert_eq!(first["nonce"], second["nonce"]);
    assert_eq!(first["wallet_address"], wallet.address.to_lowercase());
    assert_eq!(first["nonce"].as_str().unwrap().len(), 16);
}

#[tokio::test]
async fn test_generate_nonce_requires_wallet() {
    let app = spawn_app();

    let request = Request::builder()
        .method("POST")
        .uri("/generate_nonce")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("wallet_address"));
}

#[tokio::test]
async fn test_verify_malformed_body_uses_error_envelope() {
    let app = spawn_app();

    let request = Request::builder()
        .method("POST")
        .uri("/verify_signature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"wallet_address": "gabc"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let request = Request::builder()
        .method("POST")
        .uri("/verify_signature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_verify_without_nonce_is_rejected() {
    let app = spawn_app();
    let wallet = Wallet::generate();

    let (status, body) =
        submit_signature(&app, &wallet.address, "N1", &wallet.sign("N1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn test_verify_tampered_signature_is_rejected() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let (_, body) = request_nonce(&app, &wallet.address).await;
    let nonce = body["nonce"].as_str().unwrap();

    let mut signature = wallet.key.sign(nonce.as_bytes()).to_bytes();
    signature[10] ^= 0xff;

    let (status, body) =
        submit_signature(&app, &wallet.address, nonce, &STANDARD.encode(signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid signature or nonce");
}

#[tokio::test]
async fn test_verify_malformed_signature_is_reported() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let (_, body) = request_nonce(&app, &wallet.address).await;
    let nonce = body["nonce"].as_str().unwrap();

    let (status, body) = submit_signature(&app, &wallet.address, nonce, "@@not-base64@@").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid signature:"));
}

#[tokio::test]
async fn test_verify_returns_bearer_token() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    let claims = TokenIssuer::new(SECRET, 1800).validate(&token).unwrap();
    assert_eq!(claims.sub, wallet.address.to_lowercase());
}

// ============================================================================
// Token gate
// ============================================================================

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = spawn_app();

    let request = Request::builder()
        .uri("/properties")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTH");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = spawn_app();

    let request = Request::builder()
        .uri("/user-profile")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTH");
}

#[tokio::test]
async fn test_invalid_token() {
    let app = spawn_app();

    let (status, body) = send(&app, authed_get("/properties", "not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_INVALID");

    let foreign = TokenIssuer::new("other-secret", 1800)
        .issue("gabc")
        .unwrap();
    let (status, body) = send(&app, authed_get("/properties", &foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_expired_token() {
    let app = spawn_app();
    let expired = TokenIssuer::new(SECRET, 1800)
        .issue_at("gabc", Utc::now() - Duration::hours(1))
        .unwrap();

    let (status, body) = send(&app, authed_get("/properties", &expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_profile_lifecycle() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    // No profile yet
    let (status, body) = send(&app, authed_get("/user-profile", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let form = multipart_body(&profile_fields(), Some(("avatar.png", b"\x89PNG fake")));
    let (status, created) = send(&app, multipart_request("/profile", &token, form)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", created);
    let profile_id = created["id"].as_str().unwrap().to_string();
    let stored_picture = created["picture"].as_str().unwrap().to_string();
    assert!(stored_picture.starts_with("uploads/profiles/"));
    assert_eq!(created["firstName"], "Ada");

    let (status, own) = send(&app, authed_get("/user-profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["id"], profile_id.as_str());
    assert_eq!(own["phoneNumber"], "+44 20 7946 0000");
    assert_eq!(own["picture"], format!("{}/{}", BASE_URL, stored_picture));

    let (status, by_id) = send(
        &app,
        authed_get(&format!("/user-profile/{}", profile_id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["email"], "ada@example.com");

    // The stored picture is served back
    let request = Request::builder()
        .uri(format!("/{}", stored_picture))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}

#[tokio::test]
async fn test_second_profile_conflicts() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    let form = multipart_body(&profile_fields(), Some(("a.png", b"one")));
    let (status, _) = send(&app, multipart_request("/profile", &token, form)).await;
    assert_eq!(status, StatusCode::OK);

    let form = multipart_body(&profile_fields(), Some(("b.png", b"two")));
    let (status, body) = send(&app, multipart_request("/profile", &token, form)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_profile_requires_file() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    let form = multipart_body(&profile_fields(), None);
    let (status, body) = send(&app, multipart_request("/profile", &token, form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_profile_rejects_invalid_email() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    let mut fields = profile_fields();
    fields[2] = ("email", "not-an-email");
    let form = multipart_body(&fields, Some(("a.png", b"img")));
    let (status, body) = send(&app, multipart_request("/profile", &token, form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_profile_id() {
    let app = spawn_app();
    let wallet = Wallet::generate();
    let token = login(&app, &wallet).await;

    let uri = format!("/user-profile/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, authed_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, authed_get("/user-profile/not-a-uuid", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_properties_create_and_list() {
    let app = spawn_app();
    let token = TokenIssuer::new(SECRET, 1800).issue("gabc").unwrap();

    let (status, body) = send(&app, authed_get("/properties", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let form = multipart_body(
        &[
            ("title", "Harbour loft"),
            ("description", "Two bedrooms, sea view"),
            ("price", "350000"),
        ],
        Some(("loft.jpg", b"jpeg bytes")),
    );
    let (status, created) = send(&app, multipart_request("/property", &token, form)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", created);
    let stored_image = created["image"].as_str().unwrap().to_string();
    assert!(stored_image.starts_with("uploads/properties/"));

    let (status, listed) = send(&app, authed_get("/properties", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Harbour loft");
    assert_eq!(listed[0]["price"], "350000");
    assert_eq!(listed[0]["image"], format!("{}/{}", BASE_URL, stored_image));

    let uri = format!("/property/{}", created["id"].as_str().unwrap());
    let (status, fetched) = send(&app, authed_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);
}

#[tokio::test]
async fn test_property_rejects_unsupported_file() {
    let app = spawn_app();
    let token = TokenIssuer::new(SECRET, 1800).issue("gabc").unwrap();

    let form = multipart_body(
        &[("title", "Shed"), ("description", ""), ("price", "10")],
        Some(("shed.exe", b"MZ")),
    );
    let (status, _) = send(&app, multipart_request("/property", &token, form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_property_requires_token() {
    let app = spawn_app();

    let form = multipart_body(&[("title", "Shed")], Some(("shed.png", b"png")));
    let request = Request::builder()
        .method("POST")
        .uri("/property")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(form))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_AUTH");
}

// ============================================================================
// Ambient endpoints
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = spawn_app();

    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["cache-control"], "no-store");
}
