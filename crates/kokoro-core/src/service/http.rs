use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{self, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{Config, CorsConfig};
use crate::error::{ConfigError, StoreError};
use crate::provider::CompletionProvider;
use crate::service::companion::CompanionService;
use crate::service::diary::DiaryService;
use crate::service::profile::{ProfileService, ProfileUpdate};
use crate::store::{DiaryDoc, DocumentStore, SharedStore};
use crate::types::UserProfile;

/// Shared application state for the HTTP API.
pub struct AppState {
    pub config: Config,
    pub profile: ProfileService,
    pub diary: DiaryService,
    pub companion: CompanionService,
}

impl AppState {
    /// Wire the services around a store and a completion provider.
    pub fn new(
        config: Config,
        store: Box<dyn DocumentStore>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let store: SharedStore = Arc::new(Mutex::new(store));
        Self {
            config,
            profile: ProfileService::new(store.clone()),
            diary: DiaryService::new(store),
            companion: CompanionService::new(provider),
        }
    }
}

/// Request body for diary writes.
#[derive(Debug, Deserialize)]
pub struct DiaryRequest {
    pub date: Option<String>,
    pub text: String,
}

/// A diary entry as returned to clients.
#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub id: String,
    pub date: String,
    pub text: String,
}

impl From<DiaryDoc> for DiaryResponse {
    fn from(doc: DiaryDoc) -> Self {
        Self {
            id: doc.id.to_string(),
            date: doc.date,
            text: doc.text,
        }
    }
}

/// Query parameters for diary listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub profile: Option<UserProfile>,
    pub mood: Option<String>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API error with a `{"detail": "..."}` body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!("Store operation failed: {}", err);
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(d) => (StatusCode::BAD_REQUEST, d),
            ApiError::NotFound(d) => (StatusCode::NOT_FOUND, d),
            ApiError::Internal(d) => (StatusCode::INTERNAL_SERVER_ERROR, d),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// Create the axum Router with all API routes.
pub fn create_router(state: Arc<AppState>) -> crate::error::Result<Router> {
    let cors = build_cors(&state.config.cors)?;
    Ok(Router::new()
        // Profile
        .route("/profile", get(handle_read_profile))
        .route("/profile", put(handle_update_profile))
        // Diary
        .route("/diary", post(handle_create_diary))
        .route("/diary", get(handle_list_diary))
        .route("/diary/{id}", delete(handle_delete_diary))
        // Chat
        .route("/chat", post(handle_chat))
        // Health
        .route("/health", get(handle_health))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state))
}

fn build_cors(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    // tower-http rejects credentials combined with a wildcard origin.
    if config.allow_any() {
        return Ok(cors.allow_origin(Any));
    }

    let mut origins = Vec::with_capacity(config.allowed_origins.len());
    for origin in &config.allowed_origins {
        let value = origin
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::Invalid(format!("bad CORS origin: {origin}")))?;
        origins.push(value);
    }
    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

/// GET /profile — read the profile, creating the default one if absent.
async fn handle_read_profile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.profile.read().await?;
    Ok(Json(profile))
}

/// PUT /profile — merge non-empty fields over the stored profile.
async fn handle_update_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.profile.update(req).await?;
    Ok(Json(profile))
}

/// POST /diary — create an entry, or append when the date already has one.
async fn handle_create_diary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiaryRequest>,
) -> Result<Json<DiaryResponse>, ApiError> {
    let doc = state.diary.create_or_append(req.date, req.text).await?;
    Ok(Json(DiaryResponse::from(doc)))
}

/// GET /diary — list entries, newest date first.
async fn handle_list_diary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DiaryResponse>>, ApiError> {
    let docs = state.diary.list(params.limit).await?;
    Ok(Json(docs.into_iter().map(DiaryResponse::from).collect()))
}

/// DELETE /diary/{id} — remove one entry.
async fn handle_delete_diary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid entry id"))?;
    if !state.diary.delete(id).await? {
        return Err(ApiError::not_found("Diary entry not found"));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// POST /chat — one companion turn.
///
/// Always replies 200: completion failures are embedded in the reply text
/// so existing clients keep working. The failure is still logged here.
async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(
        "Chat request: {} chars, mood={}",
        req.message.len(),
        req.mood.as_deref().unwrap_or("-")
    );

    let reply = match state
        .companion
        .respond(&req.message, req.profile, req.mood.as_deref())
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Completion failed: {}", e);
            format!("Error generating response: {}", e)
        }
    };

    Json(ChatResponse { reply })
}

/// GET /health — Health check
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Start the HTTP server on the given address.
pub async fn serve(addr: &str, state: Arc<AppState>) -> crate::error::Result<()> {
    let router = create_router(state)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
