//! Agreement business logic - create and look up agreements and their
//! external collaborators (contracts, issues, time entries).
//!
//! These operations exist so the reconciliation engine can be exercised end
//! to end; contracts, issues, and time entries are otherwise read-only from
//! its perspective. All functions are async and return Result types for error
//! handling.

use crate::{
    entities::{Agreement, Issue, agreement, contract, issue, time_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Finds an agreement by its unique ID.
pub async fn get_agreement_by_id(
    db: &DatabaseConnection,
    agreement_id: i64,
) -> Result<Option<agreement::Model>> {
    Agreement::find_by_id(agreement_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new agreement, performing input validation.
///
/// The name must be non-empty after trimming. Both dates may be absent; an
/// agreement with an incomplete range has an empty effective month range
/// until both bounds are set.
pub async fn create_agreement(
    db: &DatabaseConnection,
    name: String,
    contract_id: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<agreement::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Agreement name cannot be empty".to_string(),
        });
    }

    let agreement = agreement::ActiveModel {
        name: Set(name.trim().to_string()),
        contract_id: Set(contract_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        ..Default::default()
    };

    let result = agreement.insert(db).await?;
    Ok(result)
}

/// Creates a new contract. A negative billable rate is rejected; an absent
/// rate is allowed and short-circuits labor spend to zero.
pub async fn create_contract(
    db: &DatabaseConnection,
    name: String,
    billable_rate: Option<f64>,
) -> Result<contract::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Contract name cannot be empty".to_string(),
        });
    }
    if let Some(rate) = billable_rate {
        if rate < 0.0 {
            return Err(Error::InvalidAmount { amount: rate });
        }
    }

    let contract = contract::ActiveModel {
        name: Set(name.trim().to_string()),
        billable_rate: Set(billable_rate),
        ..Default::default()
    };

    let result = contract.insert(db).await?;
    Ok(result)
}

/// Creates a new issue under an agreement.
pub async fn create_issue(
    db: &DatabaseConnection,
    agreement_id: i64,
    subject: String,
) -> Result<issue::Model> {
    get_agreement_by_id(db, agreement_id)
        .await?
        .ok_or(Error::AgreementNotFound { id: agreement_id })?;

    let issue = issue::ActiveModel {
        agreement_id: Set(agreement_id),
        subject: Set(subject),
        ..Default::default()
    };

    let result = issue.insert(db).await?;
    Ok(result)
}

/// Logs a time entry against an issue, validating hours, cost, and the month
/// number.
pub async fn log_time_entry(
    db: &DatabaseConnection,
    issue_id: i64,
    hours: f64,
    cost: f64,
    billable: bool,
    year: i32,
    month: i32,
) -> Result<time_entry::Model> {
    if hours < 0.0 {
        return Err(Error::InvalidAmount { amount: hours });
    }
    if cost < 0.0 {
        return Err(Error::InvalidAmount { amount: cost });
    }
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidMonth { month });
    }
    Issue::find_by_id(issue_id)
        .one(db)
        .await?
        .ok_or(Error::IssueNotFound { id: issue_id })?;

    let entry = time_entry::ActiveModel {
        issue_id: Set(issue_id),
        hours: Set(hours),
        cost: Set(cost),
        billable: Set(billable),
        year: Set(year),
        month: Set(month),
        ..Default::default()
    };

    let result = entry.insert(db).await?;
    Ok(result)
}
