//! Appointment Bill Repository
//!
//! Bill items are inserted only by the checkout transaction
//! (`billing::checkout`); there is deliberately no update path for them
//! here.

use super::{RepoError, RepoResult};
use shared::models::{AppointmentBill, AppointmentBillItem, BillStatus};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct BillRow {
    id: i64,
    customer_id: i64,
    branch_id: Option<String>,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl BillRow {
    fn into_bill(self) -> RepoResult<AppointmentBill> {
        let status = BillStatus::parse(&self.status)
            .ok_or_else(|| RepoError::Database(format!("Unknown bill status: {}", self.status)))?;
        Ok(AppointmentBill {
            id: self.id,
            customer_id: self.customer_id,
            branch_id: self.branch_id,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub async fn create(
    pool: &SqlitePool,
    customer_id: i64,
    branch_id: Option<String>,
) -> RepoResult<AppointmentBill> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO appointment_bill (id, customer_id, branch_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, 'ACTIVE', ?4, ?4)",
    )
    .bind(id)
    .bind(customer_id)
    .bind(&branch_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create bill".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AppointmentBill>> {
    let row = sqlx::query_as::<_, BillRow>(
        "SELECT id, customer_id, branch_id, status, created_at, updated_at FROM appointment_bill WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(BillRow::into_bill).transpose()
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: BillStatus) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE appointment_bill SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Void a bill. Its payments stay on the ledger (audit trail) but stop
/// counting toward member spend.
pub async fn void(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    set_status(pool, id, BillStatus::Void).await
}

pub async fn list_items(pool: &SqlitePool, bill_id: i64) -> RepoResult<Vec<AppointmentBillItem>> {
    let rows = sqlx::query_as::<_, AppointmentBillItem>(
        "SELECT id, bill_id, name_snapshot, final_price_snapshot, variants_snapshot, created_at FROM appointment_bill_item WHERE bill_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(bill_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_item(pool: &SqlitePool, item_id: i64) -> RepoResult<Option<AppointmentBillItem>> {
    let row = sqlx::query_as::<_, AppointmentBillItem>(
        "SELECT id, bill_id, name_snapshot, final_price_snapshot, variants_snapshot, created_at FROM appointment_bill_item WHERE id = ?",
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
