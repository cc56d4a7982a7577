//! Cart Repository
//!
//! Cart rows are ephemeral: created while shopping, deleted inside the
//! checkout transaction once their prices are frozen into bill items.

use super::{RepoError, RepoResult};
use shared::billing::{CartItem, PriceQuote, VariantSelection};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    customer_id: i64,
    service_id: i64,
    selection: String,
    base_price: i64,
    final_price: i64,
    created_at: i64,
}

impl CartItemRow {
    fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            customer_id: self.customer_id,
            service_id: self.service_id,
            // rows are short-lived and written by us; a corrupt payload
            // degrades to an empty selection rather than failing reads
            selection: serde_json::from_str(&self.selection).unwrap_or_default(),
            base_price: self.base_price,
            final_price: self.final_price,
            created_at: self.created_at,
        }
    }
}

pub async fn create(
    pool: &SqlitePool,
    customer_id: i64,
    service_id: i64,
    selection: &VariantSelection,
    quote: &PriceQuote,
) -> RepoResult<CartItem> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let selection_json =
        serde_json::to_string(selection).map_err(|e| RepoError::Validation(e.to_string()))?;

    sqlx::query(
        "INSERT INTO cart_item (id, customer_id, service_id, selection, base_price, final_price, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(customer_id)
    .bind(service_id)
    .bind(&selection_json)
    .bind(quote.base_price)
    .bind(quote.final_price)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cart item".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CartItem>> {
    let row = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, customer_id, service_id, selection, base_price, final_price, created_at FROM cart_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(CartItemRow::into_cart_item))
}

pub async fn find_for_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, customer_id, service_id, selection, base_price, final_price, created_at FROM cart_item WHERE customer_id = ? ORDER BY created_at ASC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CartItemRow::into_cart_item).collect())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
