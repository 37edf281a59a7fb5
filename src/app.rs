// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::analysis::{
    AnalysisResult, CheckStatus, ChecklistItem, ErrorResponse, SeoCheckRequest,
};
use crate::models::version::VersionResponse;
use crate::services::analyzer::PageAnalyzer;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SEO_AGENT_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SEO_AGENT_VERSION");

/// Generic message for failed analyses; the cause goes into `details`.
const ANALYSIS_FAILED: &str = "Failed to analyze the URL";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<PageAnalyzer>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn root_handler() -> &'static str {
    "SEO agent is running"
}

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "seo-agent".to_string(),
        version: VERSION.to_string(),
    })
}

/// Analyze one page and return its SEO checklist.
#[utoipa::path(
    post,
    path = "/seo-check",
    request_body = SeoCheckRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "Missing, empty or invalid URL", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "The page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn seo_check_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeoCheckRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) =
        payload.map_err(|e| bad_request(format!("Invalid request body: {}", e.body_text())))?;

    let url = request
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| bad_request("Please provide a URL to analyze"))?;

    state.analyzer.analyze(&url).await.map(Json).map_err(|e| {
        if e.is_client_error() {
            bad_request(e.details())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details(ANALYSIS_FAILED, e.details())),
            )
        }
    })
}

pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ErrorResponse::new("Method not allowed, use POST")),
    )
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(seo_check_handler, version_handler),
    components(schemas(
        SeoCheckRequest,
        AnalysisResult,
        ChecklistItem,
        CheckStatus,
        ErrorResponse,
        VersionResponse
    ))
)]
pub struct ApiDoc;

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/version", get(version_handler))
        .route(
            "/seo-check",
            post(seo_check_handler).fallback(method_not_allowed_handler),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
