//! Core business logic - framework-agnostic reconciliation and aggregation.
//!
//! `period` is pure calendar math; `ledger` owns the persisted budget rows;
//! `reconcile` reacts to date-range edits inside one transaction; `aggregate`
//! answers scoped budget/spend queries; `agreement` holds the create/lookup
//! operations for agreements and their collaborators.

pub mod aggregate;
pub mod agreement;
pub mod ledger;
pub mod period;
pub mod reconcile;
