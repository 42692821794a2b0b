//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement (`movement_kind` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_kind")]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Inbound movement.
    #[sea_orm(string_value = "IN")]
    In,
    /// Outbound movement.
    #[sea_orm(string_value = "OUT")]
    Out,
}

impl From<stockroom_core::valuation::MovementKind> for MovementKind {
    fn from(kind: stockroom_core::valuation::MovementKind) -> Self {
        match kind {
            stockroom_core::valuation::MovementKind::In => Self::In,
            stockroom_core::valuation::MovementKind::Out => Self::Out,
        }
    }
}

impl From<MovementKind> for stockroom_core::valuation::MovementKind {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::In => Self::In,
            MovementKind::Out => Self::Out,
        }
    }
}
