//! Project routes.

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
use stockroom_db::ProjectRepository;
use stockroom_db::repositories::ProjectError;

/// Creates the projects router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects", get(list_projects))
}

/// Request body for creating a project.
#[derive(Deserialize)]
struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

fn project_error_response(error: &ProjectError) -> Response {
    let (status, code) = match error {
        ProjectError::NotFound(_) => (StatusCode::NOT_FOUND, "PROJECT_NOT_FOUND"),
        ProjectError::Database(e) => {
            error!(error = %e, "Database error in project route");
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

/// POST /projects - Create a new project.
async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Response {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.create(payload.name, payload.description).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => project_error_response(&e),
    }
}

/// GET /projects - List all projects.
async fn list_projects(State(state): State<AppState>) -> Response {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(projects) => Json(projects).into_response(),
        Err(e) => project_error_response(&e),
    }
}
