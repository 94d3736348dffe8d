//! HTTP facade: routes, CORS, and the search/buybox handlers.

use crate::spapi::client::Catalog;
use crate::spapi::models::{BuyboxResult, NormalizedItem, QueryMode};
use crate::spapi::normalize::{extract_buybox, normalize_items};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The upstream catalog/pricing client.
    pub catalog: Arc<dyn Catalog>,
}

/// Body of `POST /api/amazon/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Query mode; keyword search when unspecified.
    #[serde(rename = "type", default)]
    pub mode: QueryMode,
}

/// Response of `POST /api/amazon/search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<NormalizedItem>,
}

/// JSON error response: `{"error": "..."}` with the matching status code.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { error: message.into(), status: StatusCode::BAD_REQUEST }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self { error: message.into(), status: StatusCode::INTERNAL_SERVER_ERROR }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    // Browser front-ends call this from any origin
    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
}

/// Builds the facade router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/amazon/search", post(search))
        .route("/api/amazon/buybox/{asin}", get(buybox))
        .layer(build_cors())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Dispatches a catalog query and flattens the results.
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("Query parameter is required"));
    }

    let started = Instant::now();
    info!("Starting search for: {} (type: {})", query, request.mode);

    let raw_items = state.catalog.search_items(query, request.mode).await.map_err(|e| {
        error!("Error searching catalog: {:#}", e);
        ApiError::internal(e.to_string())
    })?;

    info!("Found {} potential items in {:.2?}", raw_items.len(), started.elapsed());

    let items = normalize_items(&raw_items);
    info!("Parsed {} valid products in {:.2?}", items.len(), started.elapsed());

    Ok(Json(SearchResponse { items }))
}

/// Looks up the buy-box price for one ASIN.
///
/// A pricing-stage failure degrades to the zeroed result instead of an error,
/// so the front-end always receives a well-formed body.
async fn buybox(State(state): State<AppState>, Path(asin): Path<String>) -> Json<BuyboxResult> {
    let started = Instant::now();
    info!("Getting buybox and offers for ASIN: {}", asin);

    let result = match state.catalog.competitive_pricing(&asin).await {
        Ok(records) => extract_buybox(&records),
        Err(e) => {
            warn!("Could not get competitive pricing for {}: {:#}", asin, e);
            BuyboxResult::default()
        }
    };

    info!("Buybox lookup completed in {:.2?}", started.elapsed());
    Json(result)
}
