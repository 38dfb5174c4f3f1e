//! Labor budget entity - One budgeted month of billable work for an agreement.
//!
//! A row with `year`/`month` set is a dated monthly budget. A row where either
//! is NULL is a template: a budget not yet assigned to a calendar month, used
//! only as a seed while the agreement has no date range. Templates must never
//! survive a range-changing update. Rows are replaced (delete + insert) by the
//! reconciler, never updated in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Labor budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "labor_budgets")]
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
    /// Budgeted labor amount for the month
    pub budget_amount: f64,
    /// Budgeted labor hours for the month
    pub budget_hours: f64,
}

/// Defines relationships between `LaborBudget` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each labor budget belongs to one agreement
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
