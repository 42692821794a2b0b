//! Product repository for product catalog database operations.
//!
//! Stock, unit price, and stock value are owned by the posting
//! coordinator in [`super::transaction`]; this repository never touches
//! them after the row is created.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use stockroom_shared::types::{Page, PageRequest};

use crate::entities::{products, transactions};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// No product carries the given barcode.
    #[error("No product with barcode '{0}'")]
    BarcodeNotFound(String),

    /// Barcode already assigned to another product.
    #[error("Barcode '{0}' is already in use")]
    DuplicateBarcode(String),

    /// Product still has movement history and cannot be deleted.
    #[error("Cannot delete product: {0} transactions reference it")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional barcode (unique across products).
    pub barcode: Option<String>,
    /// Optional unit-of-measure label.
    pub unit: Option<String>,
    /// Opening stock quantity.
    pub stock: Decimal,
    /// Opening weighted-average unit price.
    pub unit_price: Decimal,
}

/// Input for updating a product's descriptive fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New name.
    pub name: Option<String>,
    /// New category (Some(None) clears it).
    pub category_id: Option<Option<Uuid>>,
    /// New barcode.
    pub barcode: Option<Option<String>>,
    /// New unit label.
    pub unit: Option<Option<String>>,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new product.
    ///
    /// Opening stock is valued at the opening unit price, so the exact
    /// stock value starts consistent with the displayed price.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::DuplicateBarcode`] if the barcode is taken.
    pub async fn create(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, ProductError> {
        if let Some(barcode) = &input.barcode {
            let taken = products::Entity::find()
                .filter(products::Column::Barcode.eq(barcode))
                .count(&self.db)
                .await?;
            if taken > 0 {
                return Err(ProductError::DuplicateBarcode(barcode.clone()));
            }
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            name: Set(input.name),
            barcode: Set(input.barcode),
            unit: Set(input.unit),
            stock: Set(input.stock),
            unit_price: Set(input.unit_price),
            stock_value: Set(input.stock * input.unit_price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(product.insert(&self.db).await?)
    }

    /// Lists products with optional category filter, newest first.
    pub async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<products::Model>, ProductError> {
        let mut query = products::Entity::find();

        if let Some(category_id) = category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }

        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(products::Column::CreatedAt)
            .limit(page.clamped_limit())
            .offset(page.offset)
            .all(&self.db)
            .await?;

        Ok(Page::new(items, total, page))
    }

    /// Gets a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NotFound`] if the product does not exist.
    pub async fn get(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Looks a product up by its barcode.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::BarcodeNotFound`] if no product matches.
    pub async fn find_by_barcode(&self, barcode: &str) -> Result<products::Model, ProductError> {
        products::Entity::find()
            .filter(products::Column::Barcode.eq(barcode))
            .one(&self.db)
            .await?
            .ok_or_else(|| ProductError::BarcodeNotFound(barcode.to_string()))
    }

    /// Updates a product's descriptive fields.
    ///
    /// Stock, unit price, and stock value are deliberately not updatable
    /// here; only postings may change them.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NotFound`] if the product does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(Some(barcode)) = &input.barcode {
            let taken = products::Entity::find()
                .filter(products::Column::Barcode.eq(barcode))
                .filter(products::Column::Id.ne(id))
                .count(&self.db)
                .await?;
            if taken > 0 {
                return Err(ProductError::DuplicateBarcode(barcode.clone()));
            }
        }

        let mut active: products::ActiveModel = product.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(barcode) = input.barcode {
            active.barcode = Set(barcode);
        }
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a product with no movement history.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::HasTransactions`] if movements reference
    /// the product; the audit trail must stay intact.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let references = transactions::Entity::find()
            .filter(transactions::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(ProductError::HasTransactions(references));
        }

        products::Entity::delete_by_id(product.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
