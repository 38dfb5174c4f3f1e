//! Agreement entity - Represents a retainer billing agreement.
//!
//! Each agreement carries an optional start/end date pair and an optional
//! reference to its contract. The effective month range used for all budget
//! math is `[beginning_of_month(start_date), end_of_month(end_date)]`; it is
//! empty when either bound is absent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Agreement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agreements")]
pub struct Model {
    /// Unique identifier for the agreement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the agreement (e.g., "Acme support retainer")
    pub name: String,
    /// Contract this agreement bills against, None if not yet linked
    pub contract_id: Option<i64>,
    /// First day of the retainer, None while the range is still open
    pub start_date: Option<Date>,
    /// Last day of the retainer, None while the range is still open
    pub end_date: Option<Date>,
}

/// Defines relationships between Agreement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each agreement optionally belongs to one contract
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,
    /// One agreement has many issues
    #[sea_orm(has_many = "super::issue::Entity")]
    Issues,
    /// One agreement exclusively owns its labor budgets
    #[sea_orm(has_many = "super::labor_budget::Entity")]
    LaborBudgets,
    /// One agreement exclusively owns its overhead budgets
    #[sea_orm(has_many = "super::overhead_budget::Entity")]
    OverheadBudgets,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issues.def()
    }
}

impl Related<super::labor_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LaborBudgets.def()
    }
}

impl Related<super::overhead_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OverheadBudgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
