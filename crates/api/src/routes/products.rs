//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use stockroom_db::ProductRepository;
use stockroom_db::repositories::{CreateProductInput, ProductError, UpdateProductInput};
use stockroom_shared::types::PageRequest;

/// Creates the products router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", patch(update_product))
        .route("/products/{id}", delete(delete_product))
        .route("/products/barcode/{code}", get(find_by_barcode))
}

/// Request body for creating a product.
#[derive(Deserialize)]
struct CreateProductRequest {
    name: String,
    category_id: Option<Uuid>,
    barcode: Option<String>,
    unit: Option<String>,
    #[serde(default)]
    stock: Decimal,
    #[serde(default)]
    unit_price: Decimal,
}

/// Request body for updating a product's descriptive fields.
///
/// Double-option fields distinguish "leave unchanged" (absent) from
/// "clear" (explicit null).
#[derive(Deserialize)]
struct UpdateProductRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    barcode: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    unit: Option<Option<String>>,
}

/// Deserializes a present field (including an explicit null) as
/// `Some(inner)`; an absent field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Query parameters for product listing.
///
/// Pagination fields are inlined because query-string deserialization
/// does not support `#[serde(flatten)]` with numeric fields.
#[derive(Deserialize)]
struct ListProductsQuery {
    category_id: Option<Uuid>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl ListProductsQuery {
    fn page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            limit: self.limit.unwrap_or(default.limit),
            offset: self.offset.unwrap_or(default.offset),
        }
    }
}

fn product_error_response(error: &ProductError) -> Response {
    let (status, code) = match error {
        ProductError::NotFound(_) => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
        ProductError::BarcodeNotFound(_) => (StatusCode::NOT_FOUND, "BARCODE_NOT_FOUND"),
        ProductError::DuplicateBarcode(_) => (StatusCode::CONFLICT, "DUPLICATE_BARCODE"),
        ProductError::HasTransactions(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PRODUCT_IN_USE"),
        ProductError::Database(e) => {
            error!(error = %e, "Database error in product route");
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

/// POST /products - Create a new product.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    let input = CreateProductInput {
        name: payload.name,
        category_id: payload.category_id,
        barcode: payload.barcode,
        unit: payload.unit,
        stock: payload.stock,
        unit_price: payload.unit_price,
    };

    match repo.create(input).await {
        Ok(product) => {
            info!(product_id = %product.id, name = %product.name, "Product created");
            (StatusCode::CREATED, Json(product)).into_response()
        }
        Err(e) => product_error_response(&e),
    }
}

/// GET /products - List products with optional category filter.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list(query.category_id, query.page()).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products/{id}` - Get a product by ID.
async fn get_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products/barcode/{code}` - Look a product up by barcode.
async fn find_by_barcode(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.find_by_barcode(&code).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// PATCH `/products/{id}` - Update a product's descriptive fields.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    let input = UpdateProductInput {
        name: payload.name,
        category_id: payload.category_id,
        barcode: payload.barcode,
        unit: payload.unit,
    };

    match repo.update(id, input).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// DELETE `/products/{id}` - Delete a product with no movement history.
async fn delete_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(product_id = %id, "Product deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => product_error_response(&e),
    }
}
