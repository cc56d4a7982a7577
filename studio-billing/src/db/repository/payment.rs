//! Payment Ledger Repository
//!
//! Append-only: payments and allocations are recorded at payment time
//! and never deleted. No computed totals live here — derived spend is
//! the aggregator's business.

use super::{RepoError, RepoResult};
use shared::models::{Payment, PaymentAllocation, PaymentCreate};
use sqlx::SqlitePool;

/// Record a payment against a bill
pub async fn record(pool: &SqlitePool, data: PaymentCreate) -> RepoResult<Payment> {
    if data.amount <= 0 {
        return Err(RepoError::Validation(format!(
            "Payment amount must be positive, got {}",
            data.amount
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payment (id, bill_id, amount, method, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.bill_id)
    .bind(data.amount)
    .bind(&data.method)
    .bind(&data.note)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record payment".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Payment>> {
    let row = sqlx::query_as::<_, Payment>(
        "SELECT id, bill_id, amount, method, note, created_at FROM payment WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Link a payment to a bill item it settles.
///
/// Idempotent: the (payment, item) pair is unique, re-allocating returns
/// the existing row.
pub async fn allocate(
    pool: &SqlitePool,
    payment_id: i64,
    bill_item_id: i64,
) -> RepoResult<PaymentAllocation> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT OR IGNORE INTO payment_allocation (id, payment_id, bill_item_id, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(payment_id)
    .bind(bill_item_id)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, PaymentAllocation>(
        "SELECT id, payment_id, bill_item_id, created_at FROM payment_allocation WHERE payment_id = ? AND bill_item_id = ?",
    )
    .bind(payment_id)
    .bind(bill_item_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to allocate payment".into()))
}

pub async fn list_for_bill(pool: &SqlitePool, bill_id: i64) -> RepoResult<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        "SELECT id, bill_id, amount, method, note, created_at FROM payment WHERE bill_id = ? ORDER BY created_at ASC",
    )
    .bind(bill_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every payment recorded against a customer's bills, voided bills
/// included — status filtering is the aggregator's responsibility, not
/// the ledger's.
pub async fn find_for_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        "SELECT p.id, p.bill_id, p.amount, p.method, p.note, p.created_at FROM payment p JOIN appointment_bill b ON p.bill_id = b.id WHERE b.customer_id = ? ORDER BY p.created_at ASC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_allocations(
    pool: &SqlitePool,
    payment_id: i64,
) -> RepoResult<Vec<PaymentAllocation>> {
    let rows = sqlx::query_as::<_, PaymentAllocation>(
        "SELECT id, payment_id, bill_item_id, created_at FROM payment_allocation WHERE payment_id = ? ORDER BY created_at ASC",
    )
    .bind(payment_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
