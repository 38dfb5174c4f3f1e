//! Scoped aggregates - budgeted and spent totals for an agreement.
//!
//! Every aggregate accepts an optional query date with one uniform policy:
//! no date means lifetime mode (sum everything ever persisted for the
//! agreement, no range filter); a date inside the effective range scopes the
//! sum to that calendar month; a date outside the range yields exactly zero.
//! Degenerate inputs (no contract, no billable rate, no issues, empty range)
//! short-circuit to zero rather than erroring.

use crate::{
    core::period::{self, MonthKey},
    entities::{
        Contract, Issue, LaborBudget, OverheadBudget, TimeEntry, agreement, issue, labor_budget,
        overhead_budget, time_entry,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QuerySelect, prelude::*};

/// How a query date scopes an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthScope {
    /// No query date: sum across the agreement's whole life.
    Lifetime,
    /// Query date inside the range: sum only this calendar month.
    Month(MonthKey),
    /// Query date outside the range: the aggregate is zero.
    OutOfRange,
}

fn month_scope(agreement: &agreement::Model, query_date: Option<NaiveDate>) -> MonthScope {
    match query_date {
        None => MonthScope::Lifetime,
        Some(date) if period::within_range(agreement.start_date, agreement.end_date, date) => {
            MonthScope::Month(MonthKey::from_date(date))
        }
        Some(_) => MonthScope::OutOfRange,
    }
}

/// Sum of `budget_amount` over the scoped labor budget rows.
pub async fn labor_budget_total(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    Ok(scoped_labor_budgets(db, agreement, query_date)
        .await?
        .iter()
        .map(|budget| budget.budget_amount)
        .sum())
}

/// Sum of `budget_hours` over the scoped labor budget rows.
pub async fn labor_budget_hours(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    Ok(scoped_labor_budgets(db, agreement, query_date)
        .await?
        .iter()
        .map(|budget| budget.budget_hours)
        .sum())
}

/// Sum of `budget_amount` over the scoped overhead budget rows.
pub async fn overhead_budget_total(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    let budgets = match month_scope(agreement, query_date) {
        MonthScope::OutOfRange => Vec::new(),
        MonthScope::Lifetime => {
            OverheadBudget::find()
                .filter(overhead_budget::Column::AgreementId.eq(agreement.id))
                .all(db)
                .await?
        }
        MonthScope::Month(key) => {
            OverheadBudget::find()
                .filter(overhead_budget::Column::AgreementId.eq(agreement.id))
                .filter(overhead_budget::Column::Year.eq(key.year))
                .filter(overhead_budget::Column::Month.eq(key.month))
                .all(db)
                .await?
        }
    };
    Ok(budgets.iter().map(|budget| budget.budget_amount).sum())
}

/// Billable labor spend: scoped billable hours times the contract's billable
/// rate.
///
/// Zero when the agreement has no contract, the contract has no billable
/// rate, the agreement has no issues, or the query date is out of range.
pub async fn total_spent(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    let scope = month_scope(agreement, query_date);
    if scope == MonthScope::OutOfRange {
        return Ok(0.0);
    }

    let Some(contract_id) = agreement.contract_id else {
        return Ok(0.0);
    };
    let Some(contract) = Contract::find_by_id(contract_id).one(db).await? else {
        return Ok(0.0);
    };
    let Some(rate) = contract.billable_rate else {
        return Ok(0.0);
    };

    let entries = scoped_time_entries(db, agreement, scope).await?;
    let billable_hours: f64 = entries
        .iter()
        .filter(|entry| entry.billable)
        .map(|entry| entry.hours)
        .sum();
    Ok(billable_hours * rate)
}

/// Cost of billable time logged against the agreement's issues.
///
/// The in-code partition on the `billable` flag, not a database filter, is
/// the source of truth for the labor vs overhead split.
pub async fn labor_spent(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    let (labor, _overhead) = spent_partition(db, agreement, query_date).await?;
    Ok(labor)
}

/// Cost of non-billable time logged against the agreement's issues.
pub async fn overhead_spent(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<f64> {
    let (_labor, overhead) = spent_partition(db, agreement, query_date).await?;
    Ok(overhead)
}

/// Partitions the scoped time entries by their `billable` flag and sums cost
/// on both sides: `(labor, overhead)`.
async fn spent_partition(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<(f64, f64)> {
    let scope = month_scope(agreement, query_date);
    if scope == MonthScope::OutOfRange {
        return Ok((0.0, 0.0));
    }

    let entries = scoped_time_entries(db, agreement, scope).await?;
    let (billable, non_billable): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.billable);

    let labor = billable.iter().map(|entry| entry.cost).sum();
    let overhead = non_billable.iter().map(|entry| entry.cost).sum();
    Ok((labor, overhead))
}

/// Labor budget rows selected by the scoping policy.
async fn scoped_labor_budgets(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    query_date: Option<NaiveDate>,
) -> Result<Vec<labor_budget::Model>> {
    match month_scope(agreement, query_date) {
        MonthScope::OutOfRange => Ok(Vec::new()),
        MonthScope::Lifetime => LaborBudget::find()
            .filter(labor_budget::Column::AgreementId.eq(agreement.id))
            .all(db)
            .await
            .map_err(Into::into),
        MonthScope::Month(key) => LaborBudget::find()
            .filter(labor_budget::Column::AgreementId.eq(agreement.id))
            .filter(labor_budget::Column::Year.eq(key.year))
            .filter(labor_budget::Column::Month.eq(key.month))
            .all(db)
            .await
            .map_err(Into::into),
    }
}

/// Time entries for the agreement's issues, optionally narrowed to one month.
/// Empty when the agreement has no issues.
async fn scoped_time_entries(
    db: &DatabaseConnection,
    agreement: &agreement::Model,
    scope: MonthScope,
) -> Result<Vec<time_entry::Model>> {
    let issue_ids: Vec<i64> = Issue::find()
        .filter(issue::Column::AgreementId.eq(agreement.id))
        .select_only()
        .column(issue::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    if issue_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = TimeEntry::find().filter(time_entry::Column::IssueId.is_in(issue_ids));
    if let MonthScope::Month(key) = scope {
        query = query
            .filter(time_entry::Column::Year.eq(key.year))
            .filter(time_entry::Column::Month.eq(key.month));
    }
    query.all(db).await.map_err(Into::into)
}
