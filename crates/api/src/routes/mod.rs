//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod categories;
pub mod health;
pub mod products;
pub mod projects;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(categories::routes())
        .merge(projects::routes())
        .merge(products::routes())
        .merge(transactions::routes())
}
