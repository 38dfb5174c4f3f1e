//! Time entry entity - One logged unit of work against an issue.
//!
//! Time entries are read-only from the reconciliation engine's perspective.
//! The `billable` flag is the source of truth for the labor vs overhead
//! spend partition; `year`/`month` index the entry into a calendar month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Time entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    /// Unique identifier for the time entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Issue the work was logged against
    pub issue_id: i64,
    /// Hours worked
    pub hours: f64,
    /// Internal cost of the work
    pub cost: f64,
    /// Whether the work is billable (labor) or not (overhead)
    pub billable: bool,
    /// Calendar year the work was logged in
    pub year: i32,
    /// Calendar month (1-12) the work was logged in
    pub month: i32,
}

/// Defines relationships between `TimeEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each time entry belongs to one issue
    #[sea_orm(
        belongs_to = "super::issue::Entity",
        from = "Column::IssueId",
        to = "super::issue::Column::Id"
    )]
    Issue,
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
