//! Stock movement routes: single and bulk posting plus the query surface.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use stockroom_core::valuation::MovementKind;
use stockroom_db::TransactionRepository;
use stockroom_db::repositories::{
    BulkDefaults, BulkOutcome, PostMovementInput, PostingError, TransactionFilter,
    TransactionListItem, TransactionWithDetails,
};
use stockroom_shared::types::PageRequest;

/// Creates the transactions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(post_transaction))
        .route("/transactions", get(list_transactions))
        .route("/transactions/bulk", post(post_bulk))
        .route("/transactions/recent", get(recent_transactions))
        .route("/transactions/{id}", get(get_transaction))
}

/// Request body for posting a single movement.
#[derive(Deserialize)]
struct PostMovementRequest {
    product_id: Uuid,
    movement: MovementKind,
    quantity: Decimal,
    unit_price: Option<Decimal>,
    total_value: Option<Decimal>,
    requester_name: Option<String>,
    requester_department: Option<String>,
    project_id: Option<Uuid>,
    purpose: Option<String>,
    signature: Option<String>,
}

impl From<PostMovementRequest> for PostMovementInput {
    fn from(req: PostMovementRequest) -> Self {
        Self {
            product_id: req.product_id,
            movement: req.movement,
            quantity: req.quantity,
            unit_price: req.unit_price,
            total_value: req.total_value,
            requester_name: req.requester_name,
            requester_department: req.requester_department,
            project_id: req.project_id,
            purpose: req.purpose,
            signature: req.signature,
        }
    }
}

/// Request body for posting a batch of movements.
///
/// Top-level metadata fields act as defaults for movements that leave
/// the matching field blank.
#[derive(Deserialize)]
struct PostBulkRequest {
    movements: Vec<PostMovementRequest>,
    requester_name: Option<String>,
    requester_department: Option<String>,
    project_id: Option<Uuid>,
    purpose: Option<String>,
    signature: Option<String>,
}

/// Query parameters for transaction listing.
#[derive(Deserialize)]
struct ListTransactionsQuery {
    movement: Option<MovementKind>,
    product_id: Option<Uuid>,
    project_id: Option<Uuid>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// Query parameters for the recent-transactions feed.
#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<u64>,
}

fn posting_error_response(error: &PostingError) -> Response {
    if let PostingError::Database(e) = error {
        error!(error = %e, "Database error in transaction route");
    }
    let status = StatusCode::from_u16(error.http_status_code())
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

fn details_body(details: &TransactionWithDetails) -> Value {
    json!({
        "transaction": details.transaction,
        "product_name": details.product_name,
        "barcode": details.barcode,
        "project_name": details.project_name,
        "product_state": {
            "stock": details.current_stock,
            "unit_price": details.current_unit_price,
            "stock_value": details.current_stock_value,
        }
    })
}

fn list_item_body(item: &TransactionListItem) -> Value {
    json!({
        "transaction": item.transaction,
        "product_name": item.product_name,
        "project_name": item.project_name,
    })
}

fn bulk_body(outcome: &BulkOutcome) -> Value {
    let successes: Vec<Value> = outcome
        .successes
        .iter()
        .map(|s| {
            json!({
                "index": s.index,
                "transaction_id": s.transaction_id,
                "product_name": s.product_name,
                "unit_price": s.unit_price,
                "total_price": s.total_price,
                "unit_price_before": s.unit_price_before,
                "unit_price_after": s.unit_price_after,
                "stock_before": s.stock_before,
                "stock_after": s.stock_after,
                "stock_value_after": s.stock_value_after,
            })
        })
        .collect();

    let failures: Vec<Value> = outcome
        .failures
        .iter()
        .map(|f| {
            json!({
                "index": f.index,
                "product_id": f.product_id,
                "error": f.error.error_code(),
                "message": f.error.to_string(),
            })
        })
        .collect();

    json!({
        "successful": successes.len(),
        "failed": failures.len(),
        "successes": successes,
        "failures": failures,
    })
}

/// POST /transactions - Post a single stock movement.
async fn post_transaction(
    State(state): State<AppState>,
    Json(payload): Json<PostMovementRequest>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.post_single(payload.into()).await {
        Ok(details) => (StatusCode::CREATED, Json(details_body(&details))).into_response(),
        Err(e) => posting_error_response(&e),
    }
}

/// POST /transactions/bulk - Post a batch of stock movements.
async fn post_bulk(
    State(state): State<AppState>,
    Json(payload): Json<PostBulkRequest>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    let defaults = BulkDefaults {
        requester_name: payload.requester_name,
        requester_department: payload.requester_department,
        project_id: payload.project_id,
        purpose: payload.purpose,
        signature: payload.signature,
    };
    let movements = payload
        .movements
        .into_iter()
        .map(PostMovementInput::from)
        .collect();

    match repo.post_bulk(movements, defaults).await {
        Ok(outcome) => (StatusCode::CREATED, Json(bulk_body(&outcome))).into_response(),
        Err(e) => posting_error_response(&e),
    }
}

/// GET /transactions - List movements with optional filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    let filter = TransactionFilter {
        movement: query.movement,
        product_id: query.product_id,
        project_id: query.project_id,
    };
    let default = PageRequest::default();
    let page = PageRequest {
        limit: query.limit.unwrap_or(default.limit),
        offset: query.offset.unwrap_or(default.offset),
    };

    match repo.list(filter, page).await {
        Ok(page) => Json(json!({
            "items": page.items.iter().map(list_item_body).collect::<Vec<_>>(),
            "total": page.total,
            "limit": page.limit,
            "offset": page.offset,
        }))
        .into_response(),
        Err(e) => posting_error_response(&e),
    }
}

/// GET /transactions/recent - The most recent movements.
async fn recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.recent(query.limit.unwrap_or(20)).await {
        Ok(items) => {
            Json(items.iter().map(list_item_body).collect::<Vec<_>>()).into_response()
        }
        Err(e) => posting_error_response(&e),
    }
}

/// GET `/transactions/{id}` - Get a movement with display details.
async fn get_transaction(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(details) => Json(details_body(&details)).into_response(),
        Err(e) => posting_error_response(&e),
    }
}
