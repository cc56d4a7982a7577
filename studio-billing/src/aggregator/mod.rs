//! Spend Aggregator
//!
//! Batch recompute of every member's cached `total_spent` from the
//! payment ledger. Each member is one scoped SUM plus one conditional
//! UPDATE committing on its own, so an interrupted pass leaves already
//! corrected members corrected and a re-run converges to the same fixed
//! point.

pub mod guard;

use crate::db::repository::{self, RepoResult};
use shared::BillingResult;
use sqlx::SqlitePool;

/// Outcome counts for one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    pub processed: u64,
    /// Members whose stored value actually changed — no-op writes are
    /// not performed and not counted
    pub updated: u64,
    pub failed: u64,
}

/// Recompute every member's cached spend from the payment ledger.
///
/// A single member's failure is logged with its id and counted; the loop
/// carries on to the next member rather than aborting the batch.
pub async fn recompute_total_spent(pool: &SqlitePool) -> BillingResult<RecomputeReport> {
    let member_ids = repository::member::list_ids(pool).await?;
    let mut report = RecomputeReport::default();

    for member_id in member_ids {
        report.processed += 1;
        match recompute_member(pool, member_id).await {
            Ok(true) => report.updated += 1,
            Ok(false) => {}
            Err(e) => {
                report.failed += 1;
                tracing::error!(member_id, error = %e, "Member spend recompute failed");
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        updated = report.updated,
        failed = report.failed,
        "Spend recompute finished"
    );
    Ok(report)
}

/// One member: scoped ledger SUM, then conditional write.
/// Returns whether the stored value changed.
async fn recompute_member(pool: &SqlitePool, member_id: i64) -> RepoResult<bool> {
    let total = settled_total(pool, member_id).await?;
    repository::member::update_total_spent_if_changed(pool, member_id, total).await
}

/// Ledger total for one member. The VOID exclusion lives here — the
/// generic ledger fetch deliberately returns everything.
async fn settled_total(pool: &SqlitePool, member_id: i64) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(p.amount), 0) FROM payment p JOIN appointment_bill b ON p.bill_id = b.id WHERE b.customer_id = ?1 AND b.status != 'VOID'",
    )
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
