//! Shared test utilities for the retainer ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::agreement,
    entities::{self, labor_budget, overhead_budget},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test agreement with no contract and the given date range.
pub async fn create_test_agreement(
    db: &DatabaseConnection,
    name: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<entities::agreement::Model> {
    agreement::create_agreement(db, name.to_string(), None, start_date, end_date).await
}

/// Creates a test agreement linked to a contract.
pub async fn create_agreement_with_contract(
    db: &DatabaseConnection,
    name: &str,
    contract_id: i64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<entities::agreement::Model> {
    agreement::create_agreement(db, name.to_string(), Some(contract_id), start_date, end_date)
        .await
}

/// Creates a test contract with the given billable rate.
pub async fn create_test_contract(
    db: &DatabaseConnection,
    name: &str,
    billable_rate: Option<f64>,
) -> Result<entities::contract::Model> {
    agreement::create_contract(db, name.to_string(), billable_rate).await
}

/// Creates a test issue under an agreement.
pub async fn create_test_issue(
    db: &DatabaseConnection,
    agreement_id: i64,
    subject: &str,
) -> Result<entities::issue::Model> {
    agreement::create_issue(db, agreement_id, subject.to_string()).await
}

/// Logs a test time entry against an issue.
pub async fn create_time_entry(
    db: &DatabaseConnection,
    issue_id: i64,
    hours: f64,
    cost: f64,
    billable: bool,
    year: i32,
    month: i32,
) -> Result<entities::time_entry::Model> {
    agreement::log_time_entry(db, issue_id, hours, cost, billable, year, month).await
}

/// Inserts a labor budget row directly. Pass `None` for year/month to create
/// an undated template.
pub async fn create_labor_budget(
    db: &DatabaseConnection,
    agreement_id: i64,
    year: Option<i32>,
    month: Option<i32>,
    budget_amount: f64,
    budget_hours: f64,
) -> Result<labor_budget::Model> {
    let budget = labor_budget::ActiveModel {
        agreement_id: Set(agreement_id),
        year: Set(year),
        month: Set(month),
        budget_amount: Set(budget_amount),
        budget_hours: Set(budget_hours),
        ..Default::default()
    };
    budget.insert(db).await.map_err(Into::into)
}

/// Inserts an overhead budget row directly. Pass `None` for year/month to
/// create an undated template.
pub async fn create_overhead_budget(
    db: &DatabaseConnection,
    agreement_id: i64,
    year: Option<i32>,
    month: Option<i32>,
    budget_amount: f64,
) -> Result<overhead_budget::Model> {
    let budget = overhead_budget::ActiveModel {
        agreement_id: Set(agreement_id),
        year: Set(year),
        month: Set(month),
        budget_amount: Set(budget_amount),
        ..Default::default()
    };
    budget.insert(db).await.map_err(Into::into)
}
