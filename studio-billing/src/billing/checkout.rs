//! Checkout — freezes resolved prices into bill items
//!
//! The moment a bill item is created, the resolver's output and the raw
//! selection values are copied verbatim into snapshot columns. This is
//! the mechanism that keeps historical invoices stable across later
//! catalog edits and variant deletions: nothing ever re-derives a
//! written item from the live catalog.

use crate::db::repository::{self, RepoError};
use crate::pricing::{VariantCatalog, resolve_price};
use serde_json::Value;
use shared::billing::{CartItem, PriceQuote, VariantSelection};
use shared::error::{BillingError, BillingResult};
use shared::models::{AppointmentBillItem, VariantType};
use sqlx::SqlitePool;

/// One line to bill: a service plus its selections
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckoutLine {
    pub service_id: i64,
    pub selection: VariantSelection,
}

/// Price a selection and persist it as a cart row during shopping.
/// Cart rows are ephemeral — checkout re-resolves and discards them.
pub async fn price_cart_item(
    pool: &SqlitePool,
    customer_id: i64,
    service_id: i64,
    selection: &VariantSelection,
) -> BillingResult<CartItem> {
    let quote = quote_line(pool, service_id, selection).await?.1;
    let item = repository::cart::create(pool, customer_id, service_id, selection, &quote).await?;
    Ok(item)
}

/// Create all bill items for a checkout atomically.
///
/// Every line is re-resolved against the current catalog, then all bill
/// items are inserted and the customer's cart rows deleted in a single
/// transaction: a bill item never exists without its snapshot, and a
/// validation failure on any line rolls the whole checkout back.
pub async fn checkout_bill_items(
    pool: &SqlitePool,
    bill_id: i64,
    lines: &[CheckoutLine],
) -> BillingResult<Vec<AppointmentBillItem>> {
    let bill = repository::bill::find_by_id(pool, bill_id)
        .await
        .map_err(BillingError::from)?
        .ok_or_else(|| BillingError::not_found(format!("bill {bill_id}")))?;

    // Resolve everything before opening the write transaction
    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        let (catalog, quote) = quote_line(pool, line.service_id, &line.selection).await?;
        resolved.push((catalog, &line.selection, quote));
    }

    let now = shared::util::now_millis();
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| BillingError::database(e.to_string()))?;

    let mut items = Vec::with_capacity(resolved.len());
    for (catalog, selection, quote) in resolved {
        let id = shared::util::snowflake_id();
        let name_snapshot = compose_name_snapshot(&catalog.service().name, selection);
        let variants_snapshot =
            serde_json::to_string(&compose_variants_snapshot(selection, &quote))
                .map_err(|e| BillingError::database(e.to_string()))?;

        sqlx::query(
            "INSERT INTO appointment_bill_item (id, bill_id, name_snapshot, final_price_snapshot, variants_snapshot, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(id)
        .bind(bill_id)
        .bind(&name_snapshot)
        .bind(quote.final_price)
        .bind(&variants_snapshot)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| BillingError::from(RepoError::from(e)))?;

        items.push(AppointmentBillItem {
            id,
            bill_id,
            name_snapshot,
            final_price_snapshot: quote.final_price,
            variants_snapshot,
            created_at: now,
        });
    }

    // The cart is superseded by the snapshots — drop it in the same
    // transaction
    sqlx::query("DELETE FROM cart_item WHERE customer_id = ?")
        .bind(bill.customer_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| BillingError::from(RepoError::from(e)))?;

    tx.commit()
        .await
        .map_err(|e| BillingError::database(e.to_string()))?;

    tracing::info!(bill_id, items = items.len(), "Bill items frozen at checkout");
    Ok(items)
}

/// Fetch + build catalog + resolve, shared by the cart and checkout paths
async fn quote_line(
    pool: &SqlitePool,
    service_id: i64,
    selection: &VariantSelection,
) -> BillingResult<(VariantCatalog, PriceQuote)> {
    let fetched = repository::service::fetch_with_variants(pool, service_id)
        .await
        .map_err(BillingError::from)?
        .ok_or_else(|| BillingError::not_found(format!("service {service_id}")))?;
    let catalog = VariantCatalog::new(fetched.service, fetched.variants);
    let quote = resolve_price(&catalog, selection)?;
    Ok((catalog, quote))
}

/// Compose the frozen display name: `"<service>-<color>"` when a color
/// was selected, the bare service name otherwise.
fn compose_name_snapshot(service_name: &str, selection: &VariantSelection) -> String {
    match selection.get(VariantType::Color).filter(|c| !c.is_empty()) {
        Some(color) => format!("{service_name}-{color}"),
        None => service_name.to_string(),
    }
}

/// Build the flat snapshot map: raw selection names for the non-monetary
/// groups, computed integer amounts for the fee keys. A catalog
/// design-fee choice and a free-form amount funnel into one `design_fee`
/// number — the decoder only ever sees the computed total.
fn compose_variants_snapshot(
    selection: &VariantSelection,
    quote: &PriceQuote,
) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for (variant_type, name) in &selection.choices {
        if *variant_type == VariantType::DesignFee {
            continue;
        }
        map.insert(variant_type.as_str().to_string(), Value::String(name.clone()));
    }

    let design_fee: i64 = quote
        .modifiers
        .iter()
        .filter(|m| m.kind == "design_fee")
        .map(|m| m.amount)
        .sum();
    if design_fee > 0 {
        map.insert("design_fee".to_string(), Value::from(design_fee));
    }

    let custom_addon: i64 = quote
        .modifiers
        .iter()
        .filter(|m| m.kind == "custom_addon")
        .map(|m| m.amount)
        .sum();
    if custom_addon > 0 {
        map.insert("custom_addon".to_string(), Value::from(custom_addon));
    }

    map
}
