//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for products, categories, projects, and stock
//!   movements
//! - Response envelope types
//! - Error-to-status mapping for repository errors

pub mod routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use stockroom_shared::AppError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
}

/// Renders an [`AppError`] as the standard JSON error envelope.
pub fn app_error_response(error: &AppError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": error.error_code(),
            "message": error.to_string()
        })),
    )
        .into_response()
}

async fn fallback() -> Response {
    app_error_response(&AppError::NotFound(
        "The requested route does not exist".to_string(),
    ))
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
