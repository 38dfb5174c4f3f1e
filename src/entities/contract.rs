//! Contract entity - External collaborator that carries the billable rate.
//!
//! Contracts are read-only from the reconciliation engine's perspective; the
//! only attribute it consumes is `billable_rate`, which may be absent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    /// Unique identifier for the contract
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the contract
    pub name: String,
    /// Hourly rate billed for labor, None when not negotiated yet
    pub billable_rate: Option<f64>,
}

/// Defines relationships between Contract and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One contract backs many agreements
    #[sea_orm(has_many = "super::agreement::Entity")]
    Agreements,
}

impl Related<super::agreement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agreements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
