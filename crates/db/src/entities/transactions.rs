//! `SeaORM` Entity for the transactions table.
//!
//! Transactions are immutable movement records: created once inside the
//! posting coordinator's database transaction, never updated or deleted.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MovementKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub project_id: Option<Uuid>,
    pub movement: MovementKind,
    pub quantity: Decimal,
    /// The unit cost attributed to this movement.
    pub unit_price: Decimal,
    /// `quantity * unit_price` for this movement.
    pub total_price: Decimal,
    pub stock_before: Decimal,
    pub stock_after: Decimal,
    /// The product's weighted-average price immediately after this movement.
    pub stock_unit_price: Decimal,
    /// The product's exact stock value immediately after this movement.
    pub stock_value: Decimal,
    pub requester_name: Option<String>,
    pub requester_department: Option<String>,
    pub purpose: Option<String>,
    pub signature: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
