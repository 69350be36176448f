//! Integration tests for the reqwest gateway against a loopback backend.
//!
//! A small axum app stands in for the backend so the real client sends real
//! requests; the app records what it received.

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use techvault_client::adapters::{HttpGateway, InMemoryKeyValueStore};
use techvault_client::application::{
    FailureReporter, MutationOutcome, NoticeBoard, OptimisticCell, OptimisticMutator,
    SessionKeys, SessionStore, SubmitRating,
};
use techvault_client::config::ApiConfig;
use techvault_client::domain::foundation::{ResourceId, StarRating, UserId};
use techvault_client::domain::resource::InteractionState;
use techvault_client::domain::session::{Credential, UserSummary};
use techvault_client::ports::{ApiError, NoCredential, ResourceQuery, TechVaultApi};

// =============================================================================
// Loopback backend
// =============================================================================

#[derive(Debug, Clone)]
struct Received {
    path: String,
    authorization: Option<String>,
    query: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    received: Arc<Mutex<Vec<Received>>>,
}

impl Backend {
    fn record(&self, path: String, headers: &HeaderMap, query: Option<String>, body: Option<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.received.lock().unwrap().push(Received {
            path,
            authorization,
            query,
            body,
        });
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

fn resource_json(id: &str) -> Value {
    json!({
        "id": id,
        "uploader_id": "5b0a7f7e-52a3-4c55-9a3b-2f6b1d1e0c11",
        "title": "Error handling in axum",
        "file_path": "/demo/errors.md",
        "resource_type": "doc",
        "average_rating": "4.00",
        "ratings_count": 10,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
        "technology": {"id": "7d6c5b4a-3928-4716-a5b4-c3d2e1f0a9b8", "name": "Rust"},
        "is_favorite": false,
        "user_rating": null
    })
}

async fn list_resources(
    State(backend): State<Backend>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    backend.record("/resources".into(), &headers, query, None);
    Json(json!([resource_json("9a3e2d55-0c1b-4f8e-b1a2-3c4d5e6f7a8b")]))
}

async fn get_resource(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    backend.record(format!("/resources/{}", id), &headers, None, None);
    Json(resource_json(&id))
}

async fn rate(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.record(format!("/resources/{}/rate", id), &headers, None, Some(body));
    Json(json!({"average_rating": "4.1", "ratings_count": 11, "user_rating": 5}))
}

async fn favorite_missing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Resource not found"})),
    )
}

async fn profile_invalid() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [
            {"loc": ["body", "telegram_id"], "msg": "field required"},
            {"loc": ["query", "limit"], "msg": "value is not a valid integer"}
        ]})),
    )
}

async fn favorites_wrong_shape() -> Json<Value> {
    Json(json!({"items": []}))
}

async fn recommendations_rejected() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
}

async fn mentors_slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!([]))
}

/// Serves the backend on an ephemeral port and returns the API base URL.
async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/resources", get(list_resources))
        .route("/api/resources/:id", get(get_resource))
        .route("/api/resources/:id/rate", post(rate))
        .route("/api/resources/:id/favorite", post(favorite_missing))
        .route("/api/profile", get(profile_invalid))
        .route("/api/favorites", get(favorites_wrong_shape))
        .route("/api/recommendations", get(recommendations_rejected))
        .route("/api/reference/mentors", get(mentors_slow))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/", addr)
}

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        request_timeout_secs: 1,
        ..ApiConfig::default()
    }
}

fn anonymous_gateway(base_url: String) -> HttpGateway {
    HttpGateway::new(&api_config(base_url), Arc::new(NoCredential)).unwrap()
}

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn credential_is_read_at_call_time() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let session = Arc::new(SessionStore::new(
        Arc::new(InMemoryKeyValueStore::new()),
        SessionKeys::default(),
    ));
    session.restore().await;
    let gateway = HttpGateway::new(&api_config(base_url), session.clone()).unwrap();
    let id = ResourceId::new();

    gateway.get_resource(id).await.unwrap();

    let user = UserSummary {
        id: UserId::new(),
        telegram_id: 3,
        username: None,
        first_name: None,
        last_name: None,
        team_id: None,
        skill_level_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    session
        .authenticate(Credential::new("secret-token").unwrap(), user)
        .await
        .unwrap();
    let resource = gateway.get_resource(id).await.unwrap();
    assert_eq!(resource.id, id);

    session.clear().await.unwrap();
    gateway.get_resource(id).await.unwrap();

    let seen: Vec<Option<String>> = backend
        .received()
        .into_iter()
        .map(|r| r.authorization)
        .collect();
    assert_eq!(
        seen,
        vec![None, Some("Bearer secret-token".to_string()), None]
    );
}

#[tokio::test]
async fn search_terms_travel_as_query_parameters() {
    let backend = Backend::default();
    let gateway = anonymous_gateway(spawn_backend(backend.clone()).await);

    let results = gateway
        .list_resources(&ResourceQuery::search("  async rust ").with_limit(Some(5)))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].technology.as_ref().map(|t| t.name.as_str()),
        Some("Rust")
    );
    let received = backend.received();
    assert_eq!(received[0].path, "/resources");
    assert_eq!(
        received[0].query.as_deref(),
        Some("search=async+rust&limit=5")
    );
}

// =============================================================================
// Rating reconciliation over the wire
// =============================================================================

#[tokio::test]
async fn rating_response_replaces_optimistic_aggregates() {
    let backend = Backend::default();
    let gateway = anonymous_gateway(spawn_backend(backend.clone()).await);
    let id = ResourceId::new();
    let resource = gateway.get_resource(id).await.unwrap();
    let cell = OptimisticCell::new(InteractionState::from_resource(&resource));
    let mutator = OptimisticMutator::new(
        Arc::new(gateway),
        Duration::from_secs(1),
        FailureReporter::notices_only(NoticeBoard::new()),
    );
    let five = StarRating::new(5).unwrap();

    let in_flight = mutator.start(&cell, SubmitRating::new(id, five));
    assert_eq!(cell.get().user_rating, Some(five));
    assert_eq!(cell.get().average_rating.value(), 4.0);

    assert_eq!(in_flight.finish().await, MutationOutcome::Confirmed);

    let settled = cell.get();
    assert_eq!(settled.average_rating.value(), 4.1);
    assert_eq!(settled.ratings_count, 11);
    assert_eq!(settled.user_rating, Some(five));
    let rate_call = backend
        .received()
        .into_iter()
        .find(|r| r.path.ends_with("/rate"))
        .unwrap();
    assert_eq!(rate_call.body, Some(json!({"value": 5})));
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn error_bodies_are_mapped_to_typed_errors() {
    let gateway = anonymous_gateway(spawn_backend(Backend::default()).await);

    assert_eq!(
        gateway.toggle_favorite(ResourceId::new()).await.unwrap_err(),
        ApiError::NotFound {
            detail: Some("Resource not found".to_string())
        }
    );
    assert_eq!(
        gateway.profile().await.unwrap_err(),
        ApiError::Status {
            status: 422,
            detail: Some("field required; value is not a valid integer".to_string())
        }
    );
    assert_eq!(
        gateway.recommendations().await.unwrap_err(),
        ApiError::Unauthorized {
            detail: Some("Could not validate credentials".to_string())
        }
    );
    assert!(matches!(
        gateway.favorites().await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let gateway = anonymous_gateway(spawn_backend(Backend::default()).await);

    let error = gateway.mentors().await.unwrap_err();

    assert_eq!(error, ApiError::Timeout { timeout_ms: 1000 });
    assert!(error.is_transient());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let gateway = anonymous_gateway(format!("http://{}", addr));

    let error = gateway.skill_levels().await.unwrap_err();

    assert!(matches!(error, ApiError::Network(_)), "got {:?}", error);
}
