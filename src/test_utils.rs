// Stub Openverse upstream for tests, served by a real axum listener on 127.0.0.1:0

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::{MediaKind, RegisterRequest, User};
use crate::proxy::config::OpenverseConfig;
use crate::proxy::server::AppState;

type SearchQuery = Query<HashMap<String, String>>;

#[derive(Clone)]
struct StubState {
    token_calls: Arc<AtomicUsize>,
    api_calls: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    expires_in: Option<i64>,
    token_delay: Duration,
}

pub(crate) struct StubUpstream {
    pub base_url: String,
    token_calls: Arc<AtomicUsize>,
    api_calls: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
}

impl StubUpstream {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.last_query
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .unwrap_or_default()
    }

    /// Config pointing at this stub with valid client credentials
    pub fn config(&self) -> OpenverseConfig {
        OpenverseConfig {
            base_url: self.base_url.clone(),
            client_id: Some("test-client-id".to_string()),
            client_secret: Some("test-client-secret".to_string()),
            ..OpenverseConfig::default()
        }
    }
}

pub(crate) async fn spawn_stub_upstream(expires_in: Option<i64>) -> StubUpstream {
    spawn_stub_upstream_with_delay(expires_in, Duration::ZERO).await
}

/// Token exchanges sleep for `token_delay` before answering
pub(crate) async fn spawn_stub_upstream_with_delay(
    expires_in: Option<i64>,
    token_delay: Duration,
) -> StubUpstream {
    let state = StubState {
        token_calls: Arc::new(AtomicUsize::new(0)),
        api_calls: Arc::new(AtomicUsize::new(0)),
        last_query: Arc::new(Mutex::new(None)),
        expires_in,
        token_delay,
    };

    let app = Router::new()
        .route("/v1/auth_tokens/token/", post(token_handler))
        .route(
            "/v1/images/",
            get(
                |state: State<StubState>, headers: HeaderMap, query: SearchQuery| {
                    search_handler(MediaKind::Image, state, headers, query)
                },
            ),
        )
        .route(
            "/v1/images/:id/",
            get(
                |state: State<StubState>, headers: HeaderMap, id: Path<String>| {
                    item_handler(MediaKind::Image, state, headers, id)
                },
            ),
        )
        .route(
            "/v1/audio/",
            get(
                |state: State<StubState>, headers: HeaderMap, query: SearchQuery| {
                    search_handler(MediaKind::Audio, state, headers, query)
                },
            ),
        )
        .route(
            "/v1/audio/:id/",
            get(
                |state: State<StubState>, headers: HeaderMap, id: Path<String>| {
                    item_handler(MediaKind::Audio, state, headers, id)
                },
            ),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubUpstream {
        base_url: format!("http://{}/v1", addr),
        token_calls: state.token_calls,
        api_calls: state.api_calls,
        last_query: state.last_query,
    }
}

async fn token_handler(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    if body["grant_type"] != "client_credentials" || body["client_id"] == "rejected-id" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client" })),
        )
            .into_response();
    }

    let n = state.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if !state.token_delay.is_zero() {
        tokio::time::sleep(state.token_delay).await;
    }

    let mut payload = json!({
        "access_token": format!("token-{}", n),
        "token_type": "Bearer",
        "scope": "read",
    });
    if let Some(expires_in) = state.expires_in {
        payload["expires_in"] = json!(expires_in);
    }

    Json(payload).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|v| v.starts_with("Bearer token-"))
        .unwrap_or(false)
}

fn record(kind: MediaKind, id: &str) -> Value {
    match kind {
        MediaKind::Image => json!({
            "id": id,
            "title": format!("Test {}", id),
            "creator": null,
            "url": format!("http://example.com/{}.jpg", id),
            "width": 800,
            "height": 600,
            "license": "by",
            "license_url": "http://example.com/license",
            "license_version": "4.0",
            "foreign_landing_url": format!("http://example.com/source/{}", id),
            "thumbnail": format!("http://example.com/thumb/{}.jpg", id),
            "source": "test-source",
            "detail_url": format!("http://example.com/detail/{}", id),
        }),
        MediaKind::Audio => json!({
            "id": id,
            "title": format!("Test {}", id),
            "url": format!("http://example.com/{}.mp3", id),
            "duration": 215000,
            "bit_rate": 128000,
            "license": "cc0",
            "license_url": "http://example.com/license",
            "license_version": null,
            "foreign_landing_url": format!("http://example.com/source/{}", id),
            "source": "jamendo",
            "genres": ["classical"],
        }),
    }
}

async fn search_handler(
    kind: MediaKind,
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(query): SearchQuery,
) -> Response {
    state.api_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let q = query.get("q").cloned().unwrap_or_default();
    *state
        .last_query
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(query);

    match q.as_str() {
        "bad" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Bad request" })),
        )
            .into_response(),
        "broken" => (StatusCode::BAD_GATEWAY, "upstream exploded").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => {
            let prefix = kind.noun();
            Json(json!({
                "result_count": 2,
                "page_count": 1,
                "page_size": 20,
                "page": 1,
                "results": [
                    record(kind, &format!("{}1", prefix)),
                    record(kind, &format!("{}2", prefix)),
                ],
            }))
            .into_response()
        }
    }
}

async fn item_handler(
    kind: MediaKind,
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.api_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match id.as_str() {
        "nonexistent" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Not found." })),
        )
            .into_response(),
        "boom" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "Maintenance" })),
        )
            .into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(record(kind, &id)).into_response()
        }
        "garbled" => Json(json!({ "title": "no id here" })).into_response(),
        _ => Json(record(kind, &id)).into_response(),
    }
}

/// Sign an HS256 session token for `sub` valid for `ttl_secs` (negative: already expired)
pub(crate) fn sign_session(secret: &str, sub: &str, ttl_secs: i64) -> String {
    use crate::proxy::middleware::SessionClaims;
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: sub.to_string(),
        email: "john.doe@example.com".to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign session token")
}

pub(crate) fn sample_user() -> User {
    let now = chrono::Utc::now();
    User {
        id: "60d21b4667d0d8992e610c85".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        password_hash: String::new(),
        saved_searches: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Register an account in `state` and return it with a fresh session token
pub(crate) async fn register_session(state: &AppState, email: &str) -> (User, String) {
    let user = state
        .users
        .create(RegisterRequest {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        })
        .await
        .expect("register test account");
    let token = state.session.issue(&user).expect("issue session token");
    (user, token)
}
