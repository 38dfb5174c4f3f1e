//! Issue entity - External collaborator grouping time entries under an agreement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issue database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    /// Unique identifier for the issue
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Agreement this issue is worked under
    pub agreement_id: i64,
    /// Short description of the issue
    pub subject: String,
}

/// Defines relationships between Issue and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each issue belongs to one agreement
    #[sea_orm(
        belongs_to = "super::agreement::Entity",
        from = "Column::AgreementId",
        to = "super::agreement::Column::Id"
    )]
    Agreement,
    /// One issue has many time entries
    #[sea_orm(has_many = "super::time_entry::Entity")]
    TimeEntries,
}

impl Related<super::agreement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agreement.def()
    }
}

impl Related<super::time_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
