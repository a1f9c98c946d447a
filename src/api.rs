//! REST API server for HeartLedger
//!
//! `GET /` returns the whole chain, `POST /` appends a new reading, and
//! `POST /replace` offers a competing chain to the ledger.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Request, State},
    http::{self, header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::blockchain::Block;
use crate::consensus::ChainSelection;
use crate::error::ChainError;
use crate::ledger::Ledger;

// API Configuration
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1 MiB

/// Shared handler state.
#[derive(Clone)]
pub struct Node {
    pub ledger: Ledger,
    started_at: Instant,
}

impl Node {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BlockchainError(ChainError),
    InvalidInput(String),
    PayloadTooLarge(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BlockchainError(e) => {
                let status = match &e {
                    ChainError::InvalidBlockData | ChainError::InvalidChain(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    // The tip moved between building and appending.
                    ChainError::InvalidBlock(_) | ChainError::InvalidBlockLinkage => {
                        StatusCode::CONFLICT
                    }
                    ChainError::Config(_) | ChainError::Io(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::BlockchainError(err)
    }
}

/// Every undecodable body is a 400, except one over the size limit.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(rejection.body_text()),
            _ => ApiError::InvalidInput(rejection.body_text()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
pub struct WriteBlockRequest {
    #[serde(rename = "BPM")]
    pub payload: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceResponse {
    pub adopted: bool,
    pub length: usize,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Serialize `payload` as indented JSON with the given status.
fn respond_with_json<T: Serialize>(status: StatusCode, payload: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(payload)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode response: {}", e)))?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration of every request.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints.
pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(get_blockchain).post(write_block))
        .route("/replace", post(replace_chain))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .with_state(node)
}

/// Bind `addr` and serve until the process exits.
pub async fn run_api_server(node: Arc<Node>, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_blockchain(State(node): State<Arc<Node>>) -> Result<Response, ApiError> {
    let blocks = node.ledger.snapshot();
    respond_with_json(StatusCode::OK, &blocks)
}

async fn write_block(
    State(node): State<Arc<Node>>,
    body: Result<Json<WriteBlockRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let block: Block = node.ledger.append_payload(req.payload)?;
    respond_with_json(StatusCode::CREATED, &block)
}

async fn replace_chain(
    State(node): State<Arc<Node>>,
    body: Result<Json<Vec<Block>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(candidate) = body?;
    let (selection, length) = node.ledger.replace(candidate)?;
    respond_with_json(
        StatusCode::OK,
        &ReplaceResponse {
            adopted: selection == ChainSelection::Adopted,
            length,
        },
    )
}

async fn health_check(State(node): State<Arc<Node>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "height": node.ledger.len(),
        "uptime_seconds": node.uptime_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
