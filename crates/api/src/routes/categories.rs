//! Product category routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use stockroom_db::CategoryRepository;
use stockroom_db::repositories::CategoryError;

/// Creates the categories router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories", get(list_categories))
}

/// Request body for creating a category.
#[derive(Deserialize)]
struct CreateCategoryRequest {
    name: String,
    description: Option<String>,
}

fn category_error_response(error: &CategoryError) -> Response {
    let (status, code) = match error {
        CategoryError::DuplicateName(_) => (StatusCode::CONFLICT, "DUPLICATE_CATEGORY"),
        CategoryError::NotFound(_) => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
        CategoryError::Database(e) => {
            error!(error = %e, "Database error in category route");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };
    (
        status,
        Json(json!({
            "error": code,
            "message": error.to_string()
        })),
    )
        .into_response()
}

/// POST /categories - Create a new category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Response {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.create(payload.name, payload.description).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => category_error_response(&e),
    }
}

/// GET /categories - List all categories.
async fn list_categories(State(state): State<AppState>) -> Response {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => category_error_response(&e),
    }
}
