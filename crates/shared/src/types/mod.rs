//! Shared domain types.

pub mod pagination;
pub mod precision;

pub use pagination::{Page, PageRequest};
pub use precision::{MIN_QUANTITY, PRICE_SCALE, QUANTITY_SCALE};
