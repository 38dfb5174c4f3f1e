//! Overhead budget entity - One budgeted month of non-billable spend.
//!
//! Same template/dated split as labor budgets: NULL `year` or `month` marks a
//! template row that only exists before the agreement's range is defined.
//! Overhead budgets carry no hours, only an amount.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Overhead budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "overhead_budgets")]
pub struct Model {
    /// Unique identifier for the budget row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Agreement that exclusively owns this budget
    pub agreement_id: i64,
    /// Calendar year, None for template rows
    pub year: Option<i32>,
    /// Calendar month (1-12), None for template rows
    pub month: Option<i32>,
    /// Budgeted overhead amount for the month
    pub budget_amount: f64,
}

/// Defines relationships between `OverheadBudget` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each overhead budget belongs to one agreement
    #[sea_orm(
        belongs_to = "super::agreement::Entity",
        from = "Column::AgreementId",
        to = "super::agreement::Column::Id"
    )]
    Agreement,
}

impl Related<super::agreement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agreement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
