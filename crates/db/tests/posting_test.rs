//! Integration tests for the posting coordinator.
//!
//! These run against a live Postgres with migrations applied and are
//! skipped when `DATABASE_URL` is not set.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, EntityTrait};
use std::env;
use uuid::Uuid;

use stockroom_core::valuation::MovementKind;
use stockroom_db::{
    entities::products,
    repositories::transaction::{
        BulkDefaults, PostMovementInput, PostingError, TransactionRepository,
    },
};

async fn connect_or_skip() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

async fn create_test_product(db: &DatabaseConnection) -> Uuid {
    let id = Uuid::new_v4();
    products::ActiveModel {
        id: Set(id),
        category_id: Set(None),
        name: Set(format!("Test Product {}", id)),
        barcode: Set(Some(format!("TEST-{}", id))),
        unit: Set(Some("pcs".to_string())),
        stock: Set(Decimal::ZERO),
        unit_price: Set(Decimal::ZERO),
        stock_value: Set(Decimal::ZERO),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test product");
    id
}

fn inbound(product_id: Uuid, quantity: Decimal, unit_price: Decimal) -> PostMovementInput {
    PostMovementInput {
        product_id,
        movement: MovementKind::In,
        quantity,
        unit_price: Some(unit_price),
        total_value: None,
        requester_name: Some("Integration Tester".to_string()),
        requester_department: None,
        project_id: None,
        purpose: None,
        signature: None,
    }
}

fn outbound(product_id: Uuid, quantity: Decimal, purpose: Option<&str>) -> PostMovementInput {
    PostMovementInput {
        product_id,
        movement: MovementKind::Out,
        quantity,
        unit_price: None,
        total_value: None,
        requester_name: Some("Integration Tester".to_string()),
        requester_department: None,
        project_id: None,
        purpose: purpose.map(str::to_string),
        signature: None,
    }
}

// ============================================================================
// Single posting
// ============================================================================

#[tokio::test]
async fn test_single_inbound_posting() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let details = repo
        .post_single(inbound(product_id, dec!(10), dec!(12.50)))
        .await
        .expect("Posting should succeed");

    assert_eq!(details.transaction.stock_before, dec!(0));
    assert_eq!(details.transaction.stock_after, dec!(10));
    assert_eq!(details.transaction.total_price, dec!(125.00));
    assert_eq!(details.current_stock, dec!(10));
    assert_eq!(details.current_unit_price, dec!(12.50));
    assert_eq!(details.current_stock_value, dec!(125.00));
}

#[tokio::test]
async fn test_weighted_average_across_postings() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    repo.post_single(inbound(product_id, dec!(10), dec!(10.00)))
        .await
        .expect("First posting should succeed");
    let details = repo
        .post_single(inbound(product_id, dec!(10), dec!(20.00)))
        .await
        .expect("Second posting should succeed");

    assert_eq!(details.current_stock, dec!(20));
    assert_eq!(details.current_unit_price, dec!(15.00));
    assert_eq!(details.current_stock_value, dec!(300.00));
}

#[tokio::test]
async fn test_outbound_requires_purpose() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    repo.post_single(inbound(product_id, dec!(5), dec!(4.00)))
        .await
        .expect("Inbound should succeed");

    let result = repo.post_single(outbound(product_id, dec!(1), None)).await;
    assert!(matches!(result, Err(PostingError::MissingPurpose { .. })));

    // The failed posting must not have touched the product.
    let product = products::Entity::find_by_id(product_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(5));
}

#[tokio::test]
async fn test_insufficient_stock_rolls_back() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    repo.post_single(inbound(product_id, dec!(3), dec!(7.00)))
        .await
        .expect("Inbound should succeed");

    let result = repo
        .post_single(outbound(product_id, dec!(10), Some("maintenance")))
        .await;
    match result {
        Err(PostingError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, dec!(3));
            assert_eq!(requested, dec!(10));
        }
        other => panic!("Expected InsufficientStock, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let repo = TransactionRepository::new(db);

    let result = repo
        .post_single(inbound(Uuid::new_v4(), dec!(1), dec!(1.00)))
        .await;
    assert!(matches!(result, Err(PostingError::ProductNotFound(_))));
}

// ============================================================================
// Bulk posting
// ============================================================================

#[tokio::test]
async fn test_bulk_partial_success() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let good = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let outcome = repo
        .post_bulk(
            vec![
                inbound(good, dec!(10), dec!(2.00)),
                inbound(Uuid::new_v4(), dec!(5), dec!(3.00)),
                outbound(good, dec!(4), Some("bench stock")),
            ],
            BulkDefaults::default(),
        )
        .await
        .expect("Bulk with one valid movement should succeed");

    assert_eq!(outcome.successes.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert!(matches!(
        outcome.failures[0].error,
        PostingError::ProductNotFound(_)
    ));

    // Later movements see the state left by earlier ones: the outbound
    // at index 2 issued against the stock received at index 0.
    let product = products::Entity::find_by_id(good)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(6));
    assert_eq!(product.stock_value, dec!(12.00));
}

#[tokio::test]
async fn test_bulk_chains_weighted_average_within_one_call() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    // Two inbounds against the same product in one batch: the second
    // must blend against the stock the first one just received.
    let outcome = repo
        .post_bulk(
            vec![
                inbound(product_id, dec!(10), dec!(10.00)),
                inbound(product_id, dec!(10), dec!(20.00)),
            ],
            BulkDefaults::default(),
        )
        .await
        .expect("Both inbounds should succeed");

    assert_eq!(outcome.successes.len(), 2);
    assert_eq!(outcome.failures.len(), 0);
    assert_eq!(outcome.successes[0].unit_price_after, dec!(10.00));
    assert_eq!(outcome.successes[1].stock_before, dec!(10));
    assert_eq!(outcome.successes[1].unit_price_after, dec!(15.00));
    assert_eq!(outcome.successes[1].stock_value_after, dec!(300.00));

    let product = products::Entity::find_by_id(product_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.unit_price, dec!(15.00));
    assert_eq!(product.stock, dec!(20));
}

#[tokio::test]
async fn test_bulk_all_failed_commits_nothing() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let result = repo
        .post_bulk(
            vec![
                outbound(product_id, dec!(1), Some("no stock yet")),
                inbound(Uuid::new_v4(), dec!(5), dec!(3.00)),
            ],
            BulkDefaults::default(),
        )
        .await;

    assert!(matches!(result, Err(PostingError::AllFailed { failed: 2 })));

    let product = products::Entity::find_by_id(product_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(0));
    assert_eq!(product.stock_value, dec!(0));
}

#[tokio::test]
async fn test_bulk_defaults_apply_to_movements() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    repo.post_single(inbound(product_id, dec!(10), dec!(1.00)))
        .await
        .expect("Inbound should succeed");

    // The outbound carries no purpose of its own; the bulk default
    // satisfies the purpose requirement.
    let outcome = repo
        .post_bulk(
            vec![outbound(product_id, dec!(2), None)],
            BulkDefaults {
                purpose: Some("quarterly maintenance".to_string()),
                ..BulkDefaults::default()
            },
        )
        .await
        .expect("Default purpose should satisfy the requirement");

    assert_eq!(outcome.successes.len(), 1);
    let details = repo
        .get(outcome.successes[0].transaction_id)
        .await
        .expect("Posted transaction should be readable");
    assert_eq!(
        details.transaction.purpose.as_deref(),
        Some("quarterly maintenance")
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_postings_serialize_per_product() {
    let Some(db) = connect_or_skip().await else {
        return;
    };
    let product_id = create_test_product(&db).await;
    let repo = TransactionRepository::new(db.clone());

    repo.post_single(inbound(product_id, dec!(100), dec!(2.00)))
        .await
        .expect("Seed inbound should succeed");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.post_single(outbound(product_id, dec!(1), Some("stress")))
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("Task should not panic")
            .expect("Each outbound should succeed");
    }

    // No lost updates: the row lock serializes the read-modify-write.
    let product = products::Entity::find_by_id(product_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(90));
    assert_eq!(product.stock_value, dec!(180.00));
    assert_eq!(product.unit_price, dec!(2.00));
}
