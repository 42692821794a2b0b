//! `SeaORM` entity definitions.

pub mod categories;
pub mod products;
pub mod projects;
pub mod sea_orm_active_enums;
pub mod transactions;
