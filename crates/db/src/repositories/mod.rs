//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. The posting coordinator lives in [`transaction`].

pub mod category;
pub mod product;
pub mod project;
pub mod transaction;

pub use category::{CategoryError, CategoryRepository};
pub use product::{CreateProductInput, ProductError, ProductRepository, UpdateProductInput};
pub use project::{ProjectError, ProjectRepository};
pub use transaction::{
    BulkDefaults, BulkFailure, BulkOutcome, BulkSuccess, PostMovementInput, PostingError,
    TransactionFilter, TransactionListItem, TransactionRepository, TransactionWithDetails,
};
