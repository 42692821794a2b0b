//! Transaction repository and posting coordinator.
//!
//! `post_single` and `post_bulk` both drive the valuation engine in
//! `stockroom-core` and persist the resulting product state and movement
//! record in one database transaction. Products are locked with
//! `SELECT ... FOR UPDATE`, so concurrent postings against the same
//! product serialize on the row instead of losing updates.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use stockroom_core::valuation::{
    self, MovementKind, ProductState, ValuationError, apply_movement,
};
use stockroom_shared::types::{Page, PageRequest};

use crate::entities::{products, projects, transactions};

/// Error types for posting and transaction queries.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Outbound movements must state their purpose.
    #[error("Purpose is required for outbound movements (product {product_id})")]
    MissingPurpose {
        /// The product the movement targeted.
        product_id: Uuid,
    },

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Outbound quantity exceeds the available stock.
    #[error(
        "Insufficient stock for '{product_name}'. Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        /// The product the movement targeted.
        product_id: Uuid,
        /// The product's display name.
        product_name: String,
        /// Stock on hand at posting time.
        available: Decimal,
        /// Quantity the movement asked for.
        requested: Decimal,
    },

    /// The valuation engine rejected the movement.
    #[error(transparent)]
    Valuation(#[from] ValuationError),

    /// Every movement in a bulk posting failed; nothing was committed.
    #[error("All {failed} movements failed, nothing was posted")]
    AllFailed {
        /// Number of failed movements.
        failed: usize,
    },

    /// Transaction record not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPurpose { .. } => "MISSING_PURPOSE",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::Valuation(e) => e.error_code(),
            Self::AllFailed { .. } => "ALL_MOVEMENTS_FAILED",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::MissingPurpose { .. } | Self::Valuation(_) => 400,

            // 404 Not Found
            Self::ProductNotFound(_) | Self::NotFound(_) => 404,

            // 422 Unprocessable - business rule violations
            Self::InsufficientStock { .. } | Self::AllFailed { .. } => 422,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}

/// Input for posting one stock movement.
#[derive(Debug, Clone)]
pub struct PostMovementInput {
    /// The product to move stock for.
    pub product_id: Uuid,
    /// Movement direction.
    pub movement: MovementKind,
    /// Quantity to move (positive, 3 decimal places).
    pub quantity: Decimal,
    /// Unit price for inbound movements; ignored for outbound.
    pub unit_price: Option<Decimal>,
    /// Total purchase value; used to derive the unit price when no
    /// per-unit price is supplied.
    pub total_value: Option<Decimal>,
    /// Who requested the movement.
    pub requester_name: Option<String>,
    /// Requesting department.
    pub requester_department: Option<String>,
    /// Project the movement belongs to.
    pub project_id: Option<Uuid>,
    /// Purpose statement (required for outbound movements).
    pub purpose: Option<String>,
    /// Signature payload.
    pub signature: Option<String>,
}

/// Defaults applied to bulk movements that leave metadata fields blank.
#[derive(Debug, Clone, Default)]
pub struct BulkDefaults {
    /// Default requester name.
    pub requester_name: Option<String>,
    /// Default requesting department.
    pub requester_department: Option<String>,
    /// Default project.
    pub project_id: Option<Uuid>,
    /// Default purpose statement.
    pub purpose: Option<String>,
    /// Default signature payload.
    pub signature: Option<String>,
}

impl PostMovementInput {
    /// Fills blank metadata fields from the bulk defaults.
    #[must_use]
    fn merged_with(mut self, defaults: &BulkDefaults) -> Self {
        self.requester_name = self.requester_name.or_else(|| defaults.requester_name.clone());
        self.requester_department = self
            .requester_department
            .or_else(|| defaults.requester_department.clone());
        self.project_id = self.project_id.or(defaults.project_id);
        self.purpose = self.purpose.or_else(|| defaults.purpose.clone());
        self.signature = self.signature.or_else(|| defaults.signature.clone());
        self
    }
}

/// A successfully posted bulk movement, by input index.
#[derive(Debug, Clone)]
pub struct BulkSuccess {
    /// Index of the movement in the request.
    pub index: usize,
    /// ID of the created transaction record.
    pub transaction_id: Uuid,
    /// Product display name.
    pub product_name: String,
    /// Unit price attributed to the movement.
    pub unit_price: Decimal,
    /// Movement total (`quantity * unit_price`).
    pub total_price: Decimal,
    /// Weighted-average price before the movement.
    pub unit_price_before: Decimal,
    /// Weighted-average price after the movement.
    pub unit_price_after: Decimal,
    /// Stock on hand before the movement.
    pub stock_before: Decimal,
    /// Stock on hand after the movement.
    pub stock_after: Decimal,
    /// Exact stock value after the movement.
    pub stock_value_after: Decimal,
}

/// A failed bulk movement, by input index.
#[derive(Debug)]
pub struct BulkFailure {
    /// Index of the movement in the request.
    pub index: usize,
    /// The product the movement targeted.
    pub product_id: Uuid,
    /// Why the movement was rejected.
    pub error: PostingError,
}

/// Outcome of a bulk posting: per-index successes and failures.
#[derive(Debug)]
pub struct BulkOutcome {
    /// Movements that posted.
    pub successes: Vec<BulkSuccess>,
    /// Movements that were rejected.
    pub failures: Vec<BulkFailure>,
}

/// A transaction joined with product and project display fields.
#[derive(Debug, Clone)]
pub struct TransactionWithDetails {
    /// The movement record.
    pub transaction: transactions::Model,
    /// Product display name.
    pub product_name: String,
    /// Product barcode, if any.
    pub barcode: Option<String>,
    /// Product stock after all postings to date.
    pub current_stock: Decimal,
    /// Product weighted-average price after all postings to date.
    pub current_unit_price: Decimal,
    /// Product exact stock value after all postings to date.
    pub current_stock_value: Decimal,
    /// Project display name, if the movement belongs to one.
    pub project_name: Option<String>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Filter by movement direction.
    pub movement: Option<MovementKind>,
    /// Filter by product.
    pub product_id: Option<Uuid>,
    /// Filter by project.
    pub project_id: Option<Uuid>,
}

/// A transaction list item with display names resolved.
#[derive(Debug, Clone)]
pub struct TransactionListItem {
    /// The movement record.
    pub transaction: transactions::Model,
    /// Product display name.
    pub product_name: String,
    /// Project display name, if any.
    pub project_name: Option<String>,
}

/// Internal result of posting one movement inside an open transaction.
struct PostedRow {
    row: transactions::Model,
    product_name: String,
    unit_price_before: Decimal,
}

/// Transaction repository and posting coordinator.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a single stock movement atomically.
    ///
    /// Validates the movement, applies the valuation engine, and writes
    /// the movement record plus the product's new state in one database
    /// transaction. Any failure rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::MissingPurpose`] for outbound movements
    /// without a purpose, [`PostingError::ProductNotFound`],
    /// [`PostingError::InsufficientStock`], or a
    /// [`PostingError::Valuation`] error from the engine.
    pub async fn post_single(
        &self,
        input: PostMovementInput,
    ) -> Result<TransactionWithDetails, PostingError> {
        let txn = self.db.begin().await?;
        let posted = post_one(&txn, &input).await?;
        txn.commit().await?;

        tracing::info!(
            transaction_id = %posted.row.id,
            product = %posted.product_name,
            movement = %MovementKind::from(posted.row.movement.clone()),
            quantity = %posted.row.quantity,
            unit_price = %posted.row.unit_price,
            stock_after = %posted.row.stock_after,
            "Movement posted"
        );

        self.get(posted.row.id).await
    }

    /// Posts a batch of stock movements with per-movement error capture.
    ///
    /// All movements run inside one database transaction, in input order,
    /// so a later movement against the same product sees the stock and
    /// weighted-average price left by an earlier one. A movement that
    /// fails validation is recorded under its input index and skipped;
    /// it never rolls back siblings. If every movement fails the whole
    /// transaction is rolled back and [`PostingError::AllFailed`] is
    /// returned, so nothing commits.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::AllFailed`] when no movement succeeds, or
    /// [`PostingError::Database`] on infrastructure failure (which aborts
    /// the batch).
    pub async fn post_bulk(
        &self,
        movements: Vec<PostMovementInput>,
        defaults: BulkDefaults,
    ) -> Result<BulkOutcome, PostingError> {
        let txn = self.db.begin().await?;

        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (index, movement) in movements.into_iter().enumerate() {
            let movement = movement.merged_with(&defaults);
            let product_id = movement.product_id;

            match post_one(&txn, &movement).await {
                Ok(posted) => successes.push(BulkSuccess {
                    index,
                    transaction_id: posted.row.id,
                    product_name: posted.product_name,
                    unit_price: posted.row.unit_price,
                    total_price: posted.row.total_price,
                    unit_price_before: posted.unit_price_before,
                    unit_price_after: posted.row.stock_unit_price,
                    stock_before: posted.row.stock_before,
                    stock_after: posted.row.stock_after,
                    stock_value_after: posted.row.stock_value,
                }),
                // A database error aborts the Postgres transaction; the
                // batch cannot continue past it.
                Err(error @ PostingError::Database(_)) => {
                    txn.rollback().await?;
                    return Err(error);
                }
                Err(error) => failures.push(BulkFailure {
                    index,
                    product_id,
                    error,
                }),
            }
        }

        if successes.is_empty() {
            let failed = failures.len();
            txn.rollback().await?;
            return Err(PostingError::AllFailed { failed });
        }

        txn.commit().await?;

        tracing::info!(
            successful = successes.len(),
            failed = failures.len(),
            "Bulk posting completed"
        );

        Ok(BulkOutcome {
            successes,
            failures,
        })
    }

    /// Gets a transaction by ID with product and project display fields.
    ///
    /// # Errors
    ///
    /// Returns [`PostingError::NotFound`] if the transaction does not exist.
    pub async fn get(&self, id: Uuid) -> Result<TransactionWithDetails, PostingError> {
        let (transaction, product) = transactions::Entity::find_by_id(id)
            .find_also_related(products::Entity)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound(id))?;

        let product = product.ok_or(PostingError::ProductNotFound(transaction.product_id))?;

        let project_name = match transaction.project_id {
            Some(project_id) => projects::Entity::find_by_id(project_id)
                .one(&self.db)
                .await?
                .map(|p| p.name),
            None => None,
        };

        Ok(TransactionWithDetails {
            transaction,
            product_name: product.name,
            barcode: product.barcode,
            current_stock: product.stock,
            current_unit_price: product.unit_price,
            current_stock_value: product.stock_value,
            project_name,
        })
    }

    /// Lists transactions with optional filters, newest first.
    pub async fn list(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<Page<TransactionListItem>, PostingError> {
        let mut query = transactions::Entity::find();

        if let Some(movement) = filter.movement {
            query = query.filter(
                transactions::Column::Movement
                    .eq(crate::entities::sea_orm_active_enums::MovementKind::from(movement)),
            );
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(transactions::Column::ProductId.eq(product_id));
        }
        if let Some(project_id) = filter.project_id {
            query = query.filter(transactions::Column::ProjectId.eq(project_id));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .find_also_related(products::Entity)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(page.clamped_limit())
            .offset(page.offset)
            .all(&self.db)
            .await?;

        let items = self.resolve_project_names(rows).await?;
        Ok(Page::new(items, total, page))
    }

    /// Lists the most recent transactions.
    pub async fn recent(&self, limit: u64) -> Result<Vec<TransactionListItem>, PostingError> {
        let rows = transactions::Entity::find()
            .find_also_related(products::Entity)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        self.resolve_project_names(rows).await
    }

    /// Resolves project display names for a page of rows in one query.
    async fn resolve_project_names(
        &self,
        rows: Vec<(transactions::Model, Option<products::Model>)>,
    ) -> Result<Vec<TransactionListItem>, PostingError> {
        let project_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(t, _)| t.project_id)
            .collect();

        let project_names: HashMap<Uuid, String> = if project_ids.is_empty() {
            HashMap::new()
        } else {
            projects::Entity::find()
                .filter(projects::Column::Id.is_in(project_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(transaction, product)| {
                let project_name = transaction
                    .project_id
                    .and_then(|id| project_names.get(&id).cloned());
                TransactionListItem {
                    product_name: product.map(|p| p.name).unwrap_or_default(),
                    project_name,
                    transaction,
                }
            })
            .collect())
    }
}

/// Posts one movement inside an already-open database transaction.
///
/// This is the single code path shared by `post_single` and `post_bulk`:
/// validate, lock and load the product, run the valuation engine, insert
/// the movement record, and update the product state.
async fn post_one(
    txn: &DatabaseTransaction,
    input: &PostMovementInput,
) -> Result<PostedRow, PostingError> {
    if movement_requires_purpose(input.movement, input.purpose.as_deref()) {
        return Err(PostingError::MissingPurpose {
            product_id: input.product_id,
        });
    }

    // Row lock: concurrent postings against the same product serialize
    // here instead of losing the read-modify-write.
    let product = products::Entity::find_by_id(input.product_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(PostingError::ProductNotFound(input.product_id))?;

    let pre_state = ProductState {
        stock: product.stock,
        unit_price: product.unit_price,
        stock_value: product.stock_value,
    };

    if input.movement == MovementKind::Out && product.stock < input.quantity {
        return Err(PostingError::InsufficientStock {
            product_id: product.id,
            product_name: product.name.clone(),
            available: product.stock,
            requested: input.quantity,
        });
    }

    let unit_price =
        resolve_movement_price(input.unit_price, input.total_value, input.quantity)?;
    let applied = apply_movement(&pre_state, input.movement, input.quantity, unit_price)?;

    let now = Utc::now().into();
    let row = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        project_id: Set(input.project_id),
        movement: Set(input.movement.into()),
        quantity: Set(input.quantity),
        unit_price: Set(applied.movement_unit_price),
        total_price: Set(applied.movement_total),
        stock_before: Set(pre_state.stock),
        stock_after: Set(applied.stock_after),
        stock_unit_price: Set(applied.unit_price_after),
        stock_value: Set(applied.stock_value_after),
        requester_name: Set(input.requester_name.clone()),
        requester_department: Set(input.requester_department.clone()),
        purpose: Set(input.purpose.clone()),
        signature: Set(input.signature.clone()),
        created_at: Set(now),
    };
    let inserted = row.insert(txn).await?;

    let product_name = product.name.clone();
    let mut active: products::ActiveModel = product.into();
    active.stock = Set(applied.stock_after);
    active.unit_price = Set(applied.unit_price_after);
    active.stock_value = Set(applied.stock_value_after);
    active.update(txn).await?;

    Ok(PostedRow {
        row: inserted,
        product_name,
        unit_price_before: pre_state.unit_price,
    })
}

// ============================================================================
// Pure validation helpers
// ============================================================================

/// Returns true if the movement is outbound and the purpose is blank.
#[must_use]
pub fn movement_requires_purpose(movement: MovementKind, purpose: Option<&str>) -> bool {
    movement == MovementKind::Out && purpose.is_none_or(|p| p.trim().is_empty())
}

/// Resolves the unit price for a movement.
///
/// A supplied positive per-unit price wins; a zero or negative one
/// counts as not given, so the price can still be derived from the
/// total value. Inbound movements with neither fall through to the
/// engine, which rejects them.
///
/// # Errors
///
/// Returns [`ValuationError::InvalidQuantity`] if a total value is given
/// with a sub-resolution quantity.
pub fn resolve_movement_price(
    unit_price: Option<Decimal>,
    total_value: Option<Decimal>,
    quantity: Decimal,
) -> Result<Option<Decimal>, ValuationError> {
    let unit_price = unit_price.filter(|price| *price > Decimal::ZERO);
    match (unit_price, total_value) {
        (Some(price), _) => Ok(Some(price)),
        (None, Some(total)) => Ok(Some(valuation::derive_unit_price(total, quantity)?)),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    // ========================================================================
    // Purpose requirement
    // ========================================================================

    #[test]
    fn test_outbound_requires_purpose() {
        assert!(movement_requires_purpose(MovementKind::Out, None));
        assert!(movement_requires_purpose(MovementKind::Out, Some("")));
        assert!(movement_requires_purpose(MovementKind::Out, Some("   ")));
        assert!(!movement_requires_purpose(
            MovementKind::Out,
            Some("line maintenance")
        ));
    }

    #[test]
    fn test_inbound_never_requires_purpose() {
        assert!(!movement_requires_purpose(MovementKind::In, None));
        assert!(!movement_requires_purpose(MovementKind::In, Some("")));
    }

    // ========================================================================
    // Unit price resolution
    // ========================================================================

    #[test]
    fn test_explicit_price_wins() {
        let resolved =
            resolve_movement_price(Some(dec!(4.20)), Some(dec!(1000)), dec!(10)).unwrap();
        assert_eq!(resolved, Some(dec!(4.20)));
    }

    #[test]
    fn test_price_derived_from_total() {
        let resolved = resolve_movement_price(None, Some(dec!(150.00)), dec!(40)).unwrap();
        assert_eq!(resolved, Some(dec!(3.75)));
    }

    #[test]
    fn test_no_price_no_total() {
        let resolved = resolve_movement_price(None, None, dec!(10)).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_zero_price_falls_back_to_total() {
        // A zero unit price counts as not given; the total still derives.
        let resolved = resolve_movement_price(Some(dec!(0)), Some(dec!(100)), dec!(10)).unwrap();
        assert_eq!(resolved, Some(dec!(10.00)));
    }

    #[test]
    fn test_negative_price_falls_back_to_total() {
        let resolved =
            resolve_movement_price(Some(dec!(-5)), Some(dec!(150.00)), dec!(40)).unwrap();
        assert_eq!(resolved, Some(dec!(3.75)));
    }

    #[test]
    fn test_zero_price_without_total_resolves_to_none() {
        let resolved = resolve_movement_price(Some(dec!(0)), None, dec!(10)).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_total_with_bad_quantity_is_rejected() {
        let result = resolve_movement_price(None, Some(dec!(150.00)), dec!(0));
        assert!(matches!(
            result,
            Err(ValuationError::InvalidQuantity { .. })
        ));
    }

    // ========================================================================
    // Bulk defaults merge
    // ========================================================================

    fn movement_input(purpose: Option<&str>) -> PostMovementInput {
        PostMovementInput {
            product_id: Uuid::new_v4(),
            movement: MovementKind::Out,
            quantity: dec!(1),
            unit_price: None,
            total_value: None,
            requester_name: None,
            requester_department: None,
            project_id: None,
            purpose: purpose.map(str::to_string),
            signature: None,
        }
    }

    #[test]
    fn test_defaults_fill_blank_fields() {
        let defaults = BulkDefaults {
            requester_name: Some("Chen".to_string()),
            purpose: Some("monthly issue".to_string()),
            ..BulkDefaults::default()
        };

        let merged = movement_input(None).merged_with(&defaults);
        assert_eq!(merged.requester_name.as_deref(), Some("Chen"));
        assert_eq!(merged.purpose.as_deref(), Some("monthly issue"));
    }

    #[test]
    fn test_own_fields_beat_defaults() {
        let defaults = BulkDefaults {
            purpose: Some("monthly issue".to_string()),
            ..BulkDefaults::default()
        };

        let merged = movement_input(Some("repair")).merged_with(&defaults);
        assert_eq!(merged.purpose.as_deref(), Some("repair"));
    }

    // ========================================================================
    // Error mapping
    // ========================================================================

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PostingError::MissingPurpose {
                product_id: Uuid::nil()
            }
            .error_code(),
            "MISSING_PURPOSE"
        );
        assert_eq!(
            PostingError::ProductNotFound(Uuid::nil()).error_code(),
            "PRODUCT_NOT_FOUND"
        );
        assert_eq!(
            PostingError::AllFailed { failed: 3 }.error_code(),
            "ALL_MOVEMENTS_FAILED"
        );
        assert_eq!(
            PostingError::Valuation(ValuationError::MissingUnitPrice).error_code(),
            "MISSING_UNIT_PRICE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            PostingError::MissingPurpose {
                product_id: Uuid::nil()
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            PostingError::ProductNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            PostingError::InsufficientStock {
                product_id: Uuid::nil(),
                product_name: "bolts".to_string(),
                available: dec!(1),
                requested: dec!(5),
            }
            .http_status_code(),
            422
        );
        assert_eq!(PostingError::AllFailed { failed: 3 }.http_status_code(), 422);
    }

    #[test]
    fn test_insufficient_stock_message_carries_context() {
        let err = PostingError::InsufficientStock {
            product_id: Uuid::nil(),
            product_name: "M6 bolts".to_string(),
            available: dec!(4.500),
            requested: dec!(10),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'M6 bolts'. Available: 4.500, Requested: 10"
        );
    }

    // ========================================================================
    // Properties
    // ========================================================================

    fn decimal_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An explicit positive unit price is always passed through
        /// untouched, whatever else is supplied.
        #[test]
        fn prop_explicit_price_passes_through(
            price in decimal_strategy(),
            total in proptest::option::of(decimal_strategy()),
            quantity in decimal_strategy(),
        ) {
            let resolved = resolve_movement_price(Some(price), total, quantity).unwrap();
            prop_assert_eq!(resolved, Some(price));
        }

        /// A derived price times the quantity reproduces the total value,
        /// up to the truncation of a non-terminating quotient.
        #[test]
        fn prop_derived_price_reproduces_total(
            total in decimal_strategy(),
            quantity in decimal_strategy(),
        ) {
            let resolved = resolve_movement_price(None, Some(total), quantity)
                .unwrap()
                .expect("total given, price must resolve");
            let error = (resolved * quantity - total).abs();
            prop_assert!(error < Decimal::new(1, 10));
        }
    }
}
