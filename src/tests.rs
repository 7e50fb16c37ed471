//! Integration tests for the DonorTrack client core.
//!
//! The real `ApiClient` is exercised against an in-process mock backend that
//! speaks the envelope contract; the session store runs on a throwaway
//! SQLite file.

use std::path::PathBuf;

use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::api::ApiClient;
use crate::config::Config;
use crate::engine::{self, FilterState};
use crate::errors::AppError;
use crate::models::{
    CreateDonationRequest, CreateDonatorRequest, LoginRequest, LoginSession, PaymentMethod,
    StaffUser, UpdateDonationRequest,
};
use crate::session::{init_store, SessionStore};

const TEST_TOKEN: &str = "test-token-123";

static DONATOR_LIST: Lazy<Value> = Lazy::new(|| {
    json!([
        {
            "id": 1,
            "name": "Asha Patel",
            "phone": "9876543210",
            "address": "12 Temple Road",
            "donations": [
                {
                    "id": 10,
                    "amount": 5000.0,
                    "paidAmount": 5000.0,
                    "balance": 0.0,
                    "paymentMethod": "Cash",
                    "bookNumber": "B-1",
                    "status": "PAID",
                    "user": { "name": "Ravi" }
                }
            ],
            "createdAt": "2025-11-01T08:00:00Z"
        },
        {
            "id": 2,
            "name": "Binod Kumar",
            "donations": null,
            "createdAt": "2025-11-02T08:00:00Z"
        }
    ])
});

/// Test fixture for client integration tests.
struct TestFixture {
    config: Config,
}

impl TestFixture {
    async fn new() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        let app = mock_backend();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let config = Config {
            api_base_url: format!("http://{}/api", addr),
            session_db_path: PathBuf::from("./unused.sqlite"),
            request_timeout_secs: 5,
            log_level: "warn".to_string(),
        };

        TestFixture { config }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(&self.config).expect("Failed to build client")
    }

    async fn logged_in_client(&self) -> ApiClient {
        let mut client = self.client();
        client
            .login(&LoginRequest {
                email: "admin@donortrack.org".to_string(),
                password: "secret".to_string(),
            })
            .await
            .expect("Login failed");
        client
    }
}

fn mock_backend() -> Router {
    Router::new()
        .route("/api/auth/login", post(mock_login))
        .route("/api/donators", get(mock_list_donators).post(mock_create_donator))
        .route(
            "/api/donators/{id}",
            get(mock_get_donator).delete(mock_delete_donator),
        )
        .route("/api/donations/{id}", put(mock_update_donation))
        .route("/api/summary", get(mock_summary))
        .route("/api/reports/donations", get(mock_report))
        .route("/api/donators/{id}/donations", post(mock_add_donation))
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "error": { "code": "UNAUTHORIZED", "message": "Missing or invalid token" }
        })),
    )
}

async fn mock_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "admin@donortrack.org" && body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "token": TEST_TOKEN,
                    "user": {
                        "id": 7,
                        "name": "Admin",
                        "email": "admin@donortrack.org",
                        "role": "admin"
                    }
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": { "code": "UNAUTHORIZED", "message": "Invalid credentials" }
            })),
        )
    }
}

async fn mock_list_donators(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": DONATOR_LIST.clone() })),
    )
}

async fn mock_get_donator(
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    if id == 1 {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "data": DONATOR_LIST[0].clone() })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": format!("Donator {} not found", id) }
            })),
        )
    }
}

async fn mock_create_donator(
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "id": 99,
                "name": body["name"],
                "phone": body["phone"],
                "donations": [{
                    "id": 990,
                    "amount": body["donation"]["amount"],
                    "paidAmount": body["donation"]["paidAmount"],
                    "balance": 0.0,
                    "paymentMethod": body["donation"]["paymentMethod"],
                    "bookNumber": body["donation"]["bookNumber"]
                }],
                "createdAt": "2025-11-03T09:30:00Z"
            }
        })),
    )
}

async fn mock_delete_donator(
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "success": true, "data": null })))
}

async fn mock_add_donation(
    headers: HeaderMap,
    Path(donator_id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "id": donator_id * 100,
                "amount": body["amount"],
                "paidAmount": body["paidAmount"],
                "balance": 0.0,
                "paymentMethod": body["paymentMethod"]
            }
        })),
    )
}

async fn mock_update_donation(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "id": id,
                "amount": 5000.0,
                "paidAmount": body["paidAmount"],
                "balance": 0.0,
                "paymentMethod": "Online"
            }
        })),
    )
}

async fn mock_summary(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !bearer_ok(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "totalAmount": 105000.0,
                "totalPaid": 40000.0,
                "totalBalance": 65000.0,
                "donatorCount": 2,
                "donationCount": 3
            }
        })),
    )
}

async fn mock_report(headers: HeaderMap) -> axum::response::Response {
    use axum::response::IntoResponse;

    if !bearer_ok(&headers) {
        let (status, body) = unauthorized();
        return (status, body).into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.7 donations report".to_vec(),
    )
        .into_response()
}

#[tokio::test]
async fn test_login_stores_token() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.client();
    assert!(client.token().is_none());

    let session = client
        .login(&LoginRequest {
            email: "admin@donortrack.org".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.user.name, "Admin");
    assert_eq!(session.user.role.as_deref(), Some("admin"));
    assert_eq!(client.token(), Some(TEST_TOKEN));

    client.logout();
    assert!(client.token().is_none());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.client();

    let err = client
        .login(&LoginRequest {
            email: "admin@donortrack.org".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(client.token().is_none());
}

#[tokio::test]
async fn test_login_validates_form_before_sending() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.client();

    let err = client
        .login(&LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_list_requires_token() {
    let fixture = TestFixture::new().await;
    let client = fixture.client();

    let err = client.list_donators().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_list_normalizes_missing_donations() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let donators = client.list_donators().await.unwrap();
    assert_eq!(donators.len(), 2);
    assert_eq!(donators[0].donations.len(), 1);
    // Second donator arrives with donations: null and must come back empty.
    assert!(donators[1].donations.is_empty());
}

#[tokio::test]
async fn test_fetched_list_feeds_the_engine() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let donators = client.list_donators().await.unwrap();
    let outcome = engine::run(&donators, &FilterState::default());

    assert_eq!(outcome.len(), 2);
    assert_eq!(outcome.active_filters, 0);
    // The zero-donation donator classifies PAID with 0% progress.
    let binod = outcome
        .rows
        .iter()
        .find(|(d, _)| d.name == "Binod Kumar")
        .unwrap();
    assert_eq!(binod.1.progress(), 0.0);
}

#[tokio::test]
async fn test_get_donator_not_found() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let err = client.get_donator(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_create_donator_round_trip() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let request = CreateDonatorRequest {
        name: "Chitra Rao".to_string(),
        phone: Some("9000000001".to_string()),
        address: None,
        email: None,
        donation: CreateDonationRequest {
            amount: 12000.0,
            paid_amount: 2000.0,
            payment_method: PaymentMethod::Online,
            book_number: Some("B-7".to_string()),
        },
    };

    let created = client.create_donator(&request).await.unwrap();
    assert_eq!(created.id, 99);
    assert_eq!(created.name, "Chitra Rao");
    assert_eq!(created.donations.len(), 1);
    assert_eq!(created.donations[0].amount, 12000.0);
}

#[tokio::test]
async fn test_create_donator_rejects_invalid_form_locally() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let request = CreateDonatorRequest {
        name: "  ".to_string(),
        phone: None,
        address: None,
        email: None,
        donation: CreateDonationRequest {
            amount: 100.0,
            paid_amount: 0.0,
            payment_method: PaymentMethod::Cash,
            book_number: None,
        },
    };

    let err = client.create_donator(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_donation() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let request = UpdateDonationRequest {
        amount: None,
        paid_amount: Some(3000.0),
        payment_method: Some(PaymentMethod::Online),
        book_number: None,
    };

    let updated = client.update_donation(10, &request).await.unwrap();
    assert_eq!(updated.id, 10);
    assert_eq!(updated.paid_amount, 3000.0);
}

#[tokio::test]
async fn test_delete_donator_accepts_null_data() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    client.delete_donator(1).await.unwrap();
}

#[tokio::test]
async fn test_add_donation() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let request = CreateDonationRequest {
        amount: 700.0,
        paid_amount: 700.0,
        payment_method: PaymentMethod::Cash,
        book_number: None,
    };

    let donation = client.add_donation(2, &request).await.unwrap();
    assert_eq!(donation.id, 200);
    assert_eq!(donation.paid_amount, 700.0);
}

#[tokio::test]
async fn test_summary() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let summary = client.summary().await.unwrap();
    assert_eq!(summary.total_amount, 105000.0);
    assert_eq!(summary.total_balance, 65000.0);
    assert_eq!(summary.donator_count, 2);
}

#[tokio::test]
async fn test_report_download_returns_pdf_bytes() {
    let fixture = TestFixture::new().await;
    let client = fixture.logged_in_client().await;

    let bytes = client.download_report().await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_session_store_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("session.sqlite");

    let pool = init_store(&db_path).await.expect("Failed to init store");
    let store = SessionStore::new(pool);

    assert!(store.load().await.unwrap().is_none());

    let session = LoginSession {
        token: "persisted-token".to_string(),
        user: StaffUser {
            id: 7,
            name: "Admin".to_string(),
            email: "admin@donortrack.org".to_string(),
            role: Some("admin".to_string()),
        },
    };
    store.save(&session).await.unwrap();

    let loaded = store.load().await.unwrap().expect("Session missing");
    assert_eq!(loaded.token, "persisted-token");
    assert_eq!(loaded.user.email, "admin@donortrack.org");

    // Saving again replaces the slot instead of growing the table.
    let renewed = LoginSession {
        token: "renewed-token".to_string(),
        ..session
    };
    store.save(&renewed).await.unwrap();
    assert_eq!(store.load().await.unwrap().unwrap().token, "renewed-token");

    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_resumed_session_authenticates() {
    let fixture = TestFixture::new().await;

    let session = LoginSession {
        token: TEST_TOKEN.to_string(),
        user: StaffUser {
            id: 7,
            name: "Admin".to_string(),
            email: "admin@donortrack.org".to_string(),
            role: Some("admin".to_string()),
        },
    };
    let client = ApiClient::with_session(&fixture.config, &session).unwrap();

    let donators = client.list_donators().await.unwrap();
    assert_eq!(donators.len(), 2);
}
