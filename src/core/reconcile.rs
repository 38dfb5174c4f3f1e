//! Date-range reconciliation - keeps budget rows consistent with edited dates.
//!
//! Editing an agreement's start or end date changes which calendar months the
//! recurring budget covers. [`update_agreement_dates`] is the single entry
//! point for such edits: inside one database transaction it first extends the
//! ledger into newly covered months (cloning the old boundary month's budgets
//! as templates), then shrinks it (purging undated templates and months that
//! fell outside the new range), and finally persists the new dates. Either the
//! whole unit commits or the agreement edit fails and nothing is visible.

use crate::{
    core::{ledger, period},
    entities::{Agreement, agreement},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Updates an agreement's start/end dates, reconciling its budget ledgers in
/// the same transaction.
///
/// Order is fixed: extend on end-date change, extend on start-date change,
/// then shrink. Both extensions may fire on one update; each works off its
/// own prior boundary snapshot. An update that changes neither date performs
/// no reconciliation. Any storage failure rolls the whole edit back.
#[instrument(skip(db))]
pub async fn update_agreement_dates(
    db: &DatabaseConnection,
    agreement_id: i64,
    new_start: Option<NaiveDate>,
    new_end: Option<NaiveDate>,
) -> Result<agreement::Model> {
    let current = Agreement::find_by_id(agreement_id)
        .one(db)
        .await?
        .ok_or(Error::AgreementNotFound { id: agreement_id })?;

    let start_changed = current.start_date != new_start;
    let end_changed = current.end_date != new_end;
    if !start_changed && !end_changed {
        debug!(agreement_id, "dates unchanged, skipping reconciliation");
        return Ok(current);
    }

    // Extend, then shrink, then persist the dates - one atomic unit. The
    // transaction rolls back on drop if any step errors out.
    let txn = db.begin().await?;

    if end_changed {
        extend_for_end_change(&txn, &current, new_start, new_end).await?;
    }
    if start_changed {
        extend_for_start_change(&txn, &current, new_start, new_end).await?;
    }
    shrink(&txn, agreement_id, new_start, new_end).await?;

    let mut active: agreement::ActiveModel = current.into();
    active.start_date = Set(new_start);
    active.end_date = Set(new_end);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(agreement_id, "agreement dates updated and budgets reconciled");
    Ok(updated)
}

/// Extends the ledgers past the old end boundary.
///
/// Budgets dated at the previous end month become the templates, cloned into
/// every month of the new range strictly after the old boundary. No previous
/// end date means no budgets could have existed for it - nothing to extend.
async fn extend_for_end_change<C>(
    db: &C,
    previous: &agreement::Model,
    new_start: Option<NaiveDate>,
    new_end: Option<NaiveDate>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(previous_end) = previous.end_date else {
        return Ok(());
    };

    let labor_templates = ledger::dated_labor_budgets(db, previous.id, previous_end).await?;
    let overhead_templates = ledger::dated_overhead_budgets(db, previous.id, previous_end).await?;

    let boundary = period::end_of_month(previous_end);
    let added = period::months_after(new_start, new_end, boundary);
    debug!(
        agreement_id = previous.id,
        added_months = added.len(),
        "extending budgets past old end boundary"
    );
    for month in added {
        ledger::create_labor_from_templates(db, previous.id, month, &labor_templates).await?;
        ledger::create_overhead_from_templates(db, previous.id, month, &overhead_templates)
            .await?;
    }
    Ok(())
}

/// Extends the ledgers before the old start boundary, symmetric to
/// [`extend_for_end_change`].
async fn extend_for_start_change<C>(
    db: &C,
    previous: &agreement::Model,
    new_start: Option<NaiveDate>,
    new_end: Option<NaiveDate>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(previous_start) = previous.start_date else {
        return Ok(());
    };

    let labor_templates = ledger::dated_labor_budgets(db, previous.id, previous_start).await?;
    let overhead_templates =
        ledger::dated_overhead_budgets(db, previous.id, previous_start).await?;

    let boundary = period::first_of_month(previous_start);
    let added = period::months_before(new_start, new_end, boundary);
    debug!(
        agreement_id = previous.id,
        added_months = added.len(),
        "extending budgets before old start boundary"
    );
    for month in added {
        ledger::create_labor_from_templates(db, previous.id, month, &labor_templates).await?;
        ledger::create_overhead_from_templates(db, previous.id, month, &overhead_templates)
            .await?;
    }
    Ok(())
}

/// Purges undated templates and out-of-range months from both ledgers.
///
/// Skipped entirely when the new effective range is empty: an agreement with
/// an incomplete range keeps its budgets untouched until both bounds are
/// known again.
async fn shrink<C>(
    db: &C,
    agreement_id: i64,
    new_start: Option<NaiveDate>,
    new_end: Option<NaiveDate>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(range) = period::date_range(new_start, new_end) else {
        debug!(agreement_id, "new range is empty, skipping shrink");
        return Ok(());
    };

    ledger::purge_undated_labor(db, agreement_id).await?;
    ledger::purge_undated_overhead(db, agreement_id).await?;
    ledger::purge_labor_outside_range(db, agreement_id, &range).await?;
    ledger::purge_overhead_outside_range(db, agreement_id, &range).await?;
    Ok(())
}

/// One-time bulk seeding for an agreement transitioning from "no range" to
/// "range defined": clones every currently-undated template budget into every
/// covered month, then destroys the originals. No-op when no undated
/// templates exist, so re-running is harmless.
#[instrument(skip(db))]
pub async fn create_budgets_for_periods(db: &DatabaseConnection, agreement_id: i64) -> Result<()> {
    let agreement = Agreement::find_by_id(agreement_id)
        .one(db)
        .await?
        .ok_or(Error::AgreementNotFound { id: agreement_id })?;

    let txn = db.begin().await?;

    let labor_templates = ledger::undated_labor_templates(&txn, agreement_id).await?;
    let overhead_templates = ledger::undated_overhead_templates(&txn, agreement_id).await?;
    if labor_templates.is_empty() && overhead_templates.is_empty() {
        txn.commit().await?;
        debug!(agreement_id, "no undated templates, seeding is a no-op");
        return Ok(());
    }

    for month in period::months(agreement.start_date, agreement.end_date) {
        ledger::create_labor_from_templates(&txn, agreement_id, month, &labor_templates).await?;
        ledger::create_overhead_from_templates(&txn, agreement_id, month, &overhead_templates)
            .await?;
    }

    ledger::purge_undated_labor(&txn, agreement_id).await?;
    ledger::purge_undated_overhead(&txn, agreement_id).await?;

    txn.commit().await?;
    info!(agreement_id, "seeded monthly budgets from templates");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{LaborBudget, OverheadBudget, labor_budget, overhead_budget};
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn labor_rows(
        db: &DatabaseConnection,
        agreement_id: i64,
    ) -> Result<Vec<labor_budget::Model>> {
        LaborBudget::find()
            .filter(labor_budget::Column::AgreementId.eq(agreement_id))
            .all(db)
            .await
            .map_err(Into::into)
    }

    #[tokio::test]
    async fn test_update_unknown_agreement_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_agreement_dates(&db, 999, Some(date(2010, 1, 1)), None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AgreementNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_unchanged_dates_touch_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Same", Some(date(2010, 1, 1)), Some(date(2010, 3, 31)))
                .await?;
        // An undated template would be purged by a real date change.
        create_labor_budget(&db, agreement.id, None, None, 100.0, 10.0).await?;

        let updated =
            update_agreement_dates(&db, agreement.id, agreement.start_date, agreement.end_date)
                .await?;
        assert_eq!(updated, agreement);
        assert_eq!(labor_rows(&db, agreement.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_extend_end_clones_boundary_month() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Extend", Some(date(2010, 1, 1)), Some(date(2010, 2, 28)))
                .await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(1), 100.0, 10.0).await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(2), 100.0, 10.0).await?;
        create_overhead_budget(&db, agreement.id, Some(2010), Some(2), 30.0).await?;

        // New end 2010-04-30: months() becomes [Jan, Feb, Mar]; March is the
        // only month after the old Feb boundary (April is the trailing cutoff).
        update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), Some(date(2010, 4, 30)))
            .await?;

        let march = LaborBudget::find()
            .filter(labor_budget::Column::AgreementId.eq(agreement.id))
            .filter(labor_budget::Column::Month.eq(3))
            .all(&db)
            .await?;
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].budget_amount, 100.0);
        assert_eq!(march[0].budget_hours, 10.0);

        let april = LaborBudget::find()
            .filter(labor_budget::Column::AgreementId.eq(agreement.id))
            .filter(labor_budget::Column::Month.eq(4))
            .all(&db)
            .await?;
        assert!(april.is_empty());

        let overhead_march = OverheadBudget::find()
            .filter(overhead_budget::Column::AgreementId.eq(agreement.id))
            .filter(overhead_budget::Column::Month.eq(3))
            .all(&db)
            .await?;
        assert_eq!(overhead_march.len(), 1);
        assert_eq!(overhead_march[0].budget_amount, 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_extend_end_without_previous_end_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "OpenEnded", Some(date(2010, 1, 1)), None).await?;

        update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), Some(date(2010, 4, 30)))
            .await?;

        // No previous end date means no budgets existed to clone.
        assert!(labor_rows(&db, agreement.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_extend_start_clones_backwards() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Back", Some(date(2010, 3, 1)), Some(date(2010, 5, 31)))
                .await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(3), 150.0, 15.0).await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(4), 150.0, 15.0).await?;

        update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), Some(date(2010, 5, 31)))
            .await?;

        // January and February are the newly covered months before the old
        // March boundary, cloned from the March budgets.
        let rows = labor_rows(&db, agreement.id).await?;
        let mut months: Vec<_> = rows.iter().map(|b| b.month.unwrap()).collect();
        months.sort_unstable();
        assert_eq!(months, vec![1, 2, 3, 4]);
        assert!(rows.iter().all(|b| b.budget_amount == 150.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_both_boundaries_extend_independently() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Both", Some(date(2010, 3, 1)), Some(date(2010, 4, 30)))
                .await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(3), 100.0, 10.0).await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(4), 200.0, 20.0).await?;

        update_agreement_dates(&db, agreement.id, Some(date(2010, 2, 1)), Some(date(2010, 6, 30)))
            .await?;

        // End extension clones April into May; start extension clones March
        // into February. June is the trailing cutoff.
        let rows = labor_rows(&db, agreement.id).await?;
        let amount_for = |m: i32| {
            rows.iter()
                .find(|b| b.month == Some(m))
                .map(|b| b.budget_amount)
        };
        assert_eq!(amount_for(2), Some(100.0));
        assert_eq!(amount_for(3), Some(100.0));
        assert_eq!(amount_for(4), Some(200.0));
        assert_eq!(amount_for(5), Some(200.0));
        assert_eq!(amount_for(6), None);

        Ok(())
    }

    #[tokio::test]
    async fn test_shrink_destroys_months_past_new_end() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Shrink", Some(date(2010, 1, 1)), Some(date(2010, 4, 30)))
                .await?;
        for month in 1..=4 {
            create_labor_budget(&db, agreement.id, Some(2010), Some(month), 100.0, 10.0).await?;
            create_overhead_budget(&db, agreement.id, Some(2010), Some(month), 25.0).await?;
        }

        update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), Some(date(2010, 2, 28)))
            .await?;

        let rows = labor_rows(&db, agreement.id).await?;
        let mut months: Vec<_> = rows.iter().map(|b| b.month.unwrap()).collect();
        months.sort_unstable();
        assert_eq!(months, vec![1, 2]);

        let overhead = OverheadBudget::find()
            .filter(overhead_budget::Column::AgreementId.eq(agreement.id))
            .all(&db)
            .await?;
        assert_eq!(overhead.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_date_change_purges_undated_templates() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Undated", Some(date(2010, 1, 1)), Some(date(2010, 3, 31)))
                .await?;
        create_labor_budget(&db, agreement.id, None, None, 999.0, 99.0).await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(1), 100.0, 10.0).await?;

        update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), Some(date(2010, 2, 28)))
            .await?;

        let rows = labor_rows(&db, agreement.id).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_shrink_skipped_when_new_range_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "HalfOpen", Some(date(2010, 1, 1)), Some(date(2010, 2, 28)))
                .await?;
        create_labor_budget(&db, agreement.id, Some(2010), Some(1), 100.0, 10.0).await?;
        create_labor_budget(&db, agreement.id, None, None, 50.0, 5.0).await?;

        // Dropping the end date empties the effective range: nothing is
        // purged, not even the undated template.
        let updated = update_agreement_dates(&db, agreement.id, Some(date(2010, 1, 1)), None)
            .await?;
        assert_eq!(updated.end_date, None);
        assert_eq!(labor_rows(&db, agreement.id).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_clones_templates_into_every_month() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Seed", Some(date(2010, 1, 1)), Some(date(2010, 4, 30)))
                .await?;
        create_labor_budget(&db, agreement.id, None, None, 200.0, 20.0).await?;
        create_overhead_budget(&db, agreement.id, None, None, 60.0).await?;

        create_budgets_for_periods(&db, agreement.id).await?;

        // months() for Jan-Apr is [Jan, Feb, Mar]; the originals are gone.
        let rows = labor_rows(&db, agreement.id).await?;
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|b| b.year == Some(2010)));
        assert!(rows.iter().all(|b| b.budget_amount == 200.0 && b.budget_hours == 20.0));

        let overhead = OverheadBudget::find()
            .filter(overhead_budget::Column::AgreementId.eq(agreement.id))
            .all(&db)
            .await?;
        assert_eq!(overhead.len(), 3);
        assert!(overhead.iter().all(|b| b.budget_amount == 60.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent_without_templates() -> Result<()> {
        let db = setup_test_db().await?;
        let agreement =
            create_test_agreement(&db, "Seed", Some(date(2010, 1, 1)), Some(date(2010, 4, 30)))
                .await?;
        create_labor_budget(&db, agreement.id, None, None, 200.0, 20.0).await?;

        create_budgets_for_periods(&db, agreement.id).await?;
        create_budgets_for_periods(&db, agreement.id).await?;

        assert_eq!(labor_rows(&db, agreement.id).await?.len(), 3);

        Ok(())
    }
}
