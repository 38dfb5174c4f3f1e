//! Budget ledger - persisted monthly Labor/Overhead budget rows for an agreement.
//!
//! Provides month-keyed lookup, template cloning, and the two purge operations
//! the reconciler runs after a date-range edit. Labor and overhead budgets are
//! separate tables with the same template/dated split, so the operations come
//! in pairs; the two ledgers never interact except being reconciled in
//! lockstep. All functions are generic over the connection so they run inside
//! the reconciler's transaction.

use crate::{
    core::period::MonthKey,
    entities::{LaborBudget, OverheadBudget, labor_budget, overhead_budget},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Condition, Set, prelude::*};
use std::ops::RangeInclusive;
use tracing::debug;

/// Labor budget rows persisted for exactly the month containing `month`.
/// Used by the reconciler to pick boundary-month templates: when the boundary
/// month has no budgets, there is nothing to clone.
pub async fn dated_labor_budgets<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
) -> Result<Vec<labor_budget::Model>>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    LaborBudget::find()
        .filter(labor_budget::Column::AgreementId.eq(agreement_id))
        .filter(labor_budget::Column::Year.eq(key.year))
        .filter(labor_budget::Column::Month.eq(key.month))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Overhead budget rows persisted for exactly the month containing `month`.
pub async fn dated_overhead_budgets<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
) -> Result<Vec<overhead_budget::Model>>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    OverheadBudget::find()
        .filter(overhead_budget::Column::AgreementId.eq(agreement_id))
        .filter(overhead_budget::Column::Year.eq(key.year))
        .filter(overhead_budget::Column::Month.eq(key.month))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Labor budgets persisted for the month containing `month`.
///
/// When none exist, returns a single constructed but **unsaved** zero-valued
/// budget stamped with that month, so aggregation code never branches on
/// absence.
pub async fn labor_budgets_for_month<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
) -> Result<Vec<labor_budget::Model>>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    let budgets = dated_labor_budgets(db, agreement_id, month).await?;

    if budgets.is_empty() {
        return Ok(vec![labor_budget::Model {
            id: 0,
            agreement_id,
            year: Some(key.year),
            month: Some(key.month),
            budget_amount: 0.0,
            budget_hours: 0.0,
        }]);
    }
    Ok(budgets)
}

/// Overhead budgets persisted for the month containing `month`, with the same
/// unsaved zero-valued placeholder behavior as [`labor_budgets_for_month`].
pub async fn overhead_budgets_for_month<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
) -> Result<Vec<overhead_budget::Model>>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    let budgets = dated_overhead_budgets(db, agreement_id, month).await?;

    if budgets.is_empty() {
        return Ok(vec![overhead_budget::Model {
            id: 0,
            agreement_id,
            year: Some(key.year),
            month: Some(key.month),
            budget_amount: 0.0,
        }]);
    }
    Ok(budgets)
}

/// Clones each labor template into a new persisted budget stamped with the
/// month containing `month`.
pub async fn create_labor_from_templates<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
    templates: &[labor_budget::Model],
) -> Result<()>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    for template in templates {
        let budget = labor_budget::ActiveModel {
            agreement_id: Set(agreement_id),
            year: Set(Some(key.year)),
            month: Set(Some(key.month)),
            budget_amount: Set(template.budget_amount),
            budget_hours: Set(template.budget_hours),
            ..Default::default()
        };
        budget.insert(db).await?;
    }
    Ok(())
}

/// Clones each overhead template into a new persisted budget stamped with the
/// month containing `month`.
pub async fn create_overhead_from_templates<C>(
    db: &C,
    agreement_id: i64,
    month: NaiveDate,
    templates: &[overhead_budget::Model],
) -> Result<()>
where
    C: ConnectionTrait,
{
    let key = MonthKey::from_date(month);
    for template in templates {
        let budget = overhead_budget::ActiveModel {
            agreement_id: Set(agreement_id),
            year: Set(Some(key.year)),
            month: Set(Some(key.month)),
            budget_amount: Set(template.budget_amount),
            ..Default::default()
        };
        budget.insert(db).await?;
    }
    Ok(())
}

/// Labor budget rows with an absent year or month - the transient template
/// seeds that only exist before the agreement has a date range.
pub async fn undated_labor_templates<C>(
    db: &C,
    agreement_id: i64,
) -> Result<Vec<labor_budget::Model>>
where
    C: ConnectionTrait,
{
    LaborBudget::find()
        .filter(labor_budget::Column::AgreementId.eq(agreement_id))
        .filter(
            Condition::any()
                .add(labor_budget::Column::Year.is_null())
                .add(labor_budget::Column::Month.is_null()),
        )
        .all(db)
        .await
        .map_err(Into::into)
}

/// Overhead budget rows with an absent year or month.
pub async fn undated_overhead_templates<C>(
    db: &C,
    agreement_id: i64,
) -> Result<Vec<overhead_budget::Model>>
where
    C: ConnectionTrait,
{
    OverheadBudget::find()
        .filter(overhead_budget::Column::AgreementId.eq(agreement_id))
        .filter(
            Condition::any()
                .add(overhead_budget::Column::Year.is_null())
                .add(overhead_budget::Column::Month.is_null()),
        )
        .all(db)
        .await
        .map_err(Into::into)
}

/// Destroys every labor budget whose year or month is absent.
/// Templates must never survive once the agreement's range is defined.
pub async fn purge_undated_labor<C>(db: &C, agreement_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = LaborBudget::delete_many()
        .filter(labor_budget::Column::AgreementId.eq(agreement_id))
        .filter(
            Condition::any()
                .add(labor_budget::Column::Year.is_null())
                .add(labor_budget::Column::Month.is_null()),
        )
        .exec(db)
        .await?;
    debug!(agreement_id, purged = result.rows_affected, "purged undated labor budgets");
    Ok(result.rows_affected)
}

/// Destroys every overhead budget whose year or month is absent.
pub async fn purge_undated_overhead<C>(db: &C, agreement_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = OverheadBudget::delete_many()
        .filter(overhead_budget::Column::AgreementId.eq(agreement_id))
        .filter(
            Condition::any()
                .add(overhead_budget::Column::Year.is_null())
                .add(overhead_budget::Column::Month.is_null()),
        )
        .exec(db)
        .await?;
    debug!(agreement_id, purged = result.rows_affected, "purged undated overhead budgets");
    Ok(result.rows_affected)
}

/// Destroys every dated labor budget whose first-of-month date falls outside
/// `range`. Rows with an unrepresentable month number are destroyed too.
pub async fn purge_labor_outside_range<C>(
    db: &C,
    agreement_id: i64,
    range: &RangeInclusive<NaiveDate>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let dated = LaborBudget::find()
        .filter(labor_budget::Column::AgreementId.eq(agreement_id))
        .filter(labor_budget::Column::Year.is_not_null())
        .filter(labor_budget::Column::Month.is_not_null())
        .all(db)
        .await?;

    let doomed = ids_outside_range(range, dated.iter().map(|b| (b.id, b.year, b.month)));
    if doomed.is_empty() {
        return Ok(0);
    }
    let result = LaborBudget::delete_many()
        .filter(labor_budget::Column::Id.is_in(doomed))
        .exec(db)
        .await?;
    debug!(agreement_id, purged = result.rows_affected, "purged out-of-range labor budgets");
    Ok(result.rows_affected)
}

/// Destroys every dated overhead budget whose first-of-month date falls
/// outside `range`.
pub async fn purge_overhead_outside_range<C>(
    db: &C,
    agreement_id: i64,
    range: &RangeInclusive<NaiveDate>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let dated = OverheadBudget::find()
        .filter(overhead_budget::Column::AgreementId.eq(agreement_id))
        .filter(overhead_budget::Column::Year.is_not_null())
        .filter(overhead_budget::Column::Month.is_not_null())
        .all(db)
        .await?;

    let doomed = ids_outside_range(range, dated.iter().map(|b| (b.id, b.year, b.month)));
    if doomed.is_empty() {
        return Ok(0);
    }
    let result = OverheadBudget::delete_many()
        .filter(overhead_budget::Column::Id.is_in(doomed))
        .exec(db)
        .await?;
    debug!(agreement_id, purged = result.rows_affected, "purged out-of-range overhead budgets");
    Ok(result.rows_affected)
}

/// Picks the ids of dated budget rows whose first-of-month date is not inside
/// `range`.
fn ids_outside_range(
    range: &RangeInclusive<NaiveDate>,
    rows: impl Iterator<Item = (i64, Option<i32>, Option<i32>)>,
) -> Vec<i64> {
    rows.filter_map(|(id, year, month)| {
        let first_day = year
            .zip(month)
            .map(|(y, m)| MonthKey { year: y, month: m })
            .and_then(MonthKey::first_day);
        match first_day {
            Some(day) if range.contains(&day) => None,
            _ => Some(id),
        }
    })
    .collect()
}
