//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod agreement;
pub mod contract;
pub mod issue;
pub mod labor_budget;
pub mod overhead_budget;
pub mod time_entry;

// Re-export specific types to avoid conflicts
pub use agreement::{Column as AgreementColumn, Entity as Agreement, Model as AgreementModel};
pub use contract::{Column as ContractColumn, Entity as Contract, Model as ContractModel};
pub use issue::{Column as IssueColumn, Entity as Issue, Model as IssueModel};
pub use labor_budget::{
    Column as LaborBudgetColumn, Entity as LaborBudget, Model as LaborBudgetModel,
};
pub use overhead_budget::{
    Column as OverheadBudgetColumn, Entity as OverheadBudget, Model as OverheadBudgetModel,
};
pub use time_entry::{Column as TimeEntryColumn, Entity as TimeEntry, Model as TimeEntryModel};
