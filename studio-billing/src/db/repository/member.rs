//! Member Repository

use super::{RepoError, RepoResult};
use shared::models::{Member, MemberCreate};
use sqlx::SqlitePool;

pub async fn create(pool: &SqlitePool, data: MemberCreate) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO member (id, name, phone, total_spent, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 0, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let row = sqlx::query_as::<_, Member>(
        "SELECT id, name, phone, total_spent, is_active, created_at, updated_at FROM member WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// All member IDs, for batch walks. IDs only — per-member data is read
/// inside the loop so the pass never holds the whole table.
pub async fn list_ids(pool: &SqlitePool) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM member ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Write the recomputed spend only when it differs from the stored value.
/// Returns whether a write happened; a no-op is not an update.
pub async fn update_total_spent_if_changed(
    pool: &SqlitePool,
    member_id: i64,
    total_spent: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET total_spent = ?1, updated_at = ?2 WHERE id = ?3 AND total_spent != ?1",
    )
    .bind(total_spent)
    .bind(now)
    .bind(member_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
