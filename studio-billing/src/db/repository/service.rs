//! Service Catalog Repository
//!
//! Variant administration itself lives in external tooling; these
//! functions cover what the billing core needs — seeding and the
//! pricing-path fetch.

use super::{RepoError, RepoResult};
use shared::models::{Service, ServiceCreate, ServiceVariant, ServiceVariantCreate, VariantType};
use sqlx::SqlitePool;

/// A service together with its variants, as fetched for pricing
#[derive(Debug, Clone)]
pub struct ServiceWithVariants {
    pub service: Service,
    pub variants: Vec<ServiceVariant>,
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    name: String,
    base_price: i64,
    branch_id: Option<String>,
    required_types: String,
    sort_order: i32,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        // Unknown group codes in stored JSON are dropped, not fatal
        let required_types: Vec<VariantType> = serde_json::from_str::<Vec<String>>(&self.required_types)
            .unwrap_or_default()
            .iter()
            .filter_map(|s| VariantType::parse(s))
            .collect();
        Service {
            id: self.id,
            name: self.name,
            base_price: self.base_price,
            branch_id: self.branch_id,
            required_types,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: i64,
    service_id: i64,
    variant_type: String,
    name: String,
    code: String,
    price_modifier: i64,
    sort_order: i32,
    is_active: bool,
    metadata: Option<String>,
}

impl VariantRow {
    fn into_variant(self) -> Option<ServiceVariant> {
        let variant_type = match VariantType::parse(&self.variant_type) {
            Some(t) => t,
            None => {
                tracing::warn!(
                    variant_id = self.id,
                    variant_type = %self.variant_type,
                    "Skipping variant with unknown type"
                );
                return None;
            }
        };
        Some(ServiceVariant {
            id: self.id,
            service_id: self.service_id,
            variant_type,
            name: self.name,
            code: self.code,
            price_modifier: self.price_modifier,
            sort_order: self.sort_order,
            is_active: self.is_active,
            metadata: self.metadata,
        })
    }
}

pub async fn create(pool: &SqlitePool, data: ServiceCreate) -> RepoResult<Service> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let required_types = serde_json::to_string(
        &data
            .required_types
            .unwrap_or_default()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>(),
    )
    .map_err(|e| RepoError::Validation(e.to_string()))?;

    sqlx::query(
        "INSERT INTO service (id, name, base_price, branch_id, required_types, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.base_price)
    .bind(&data.branch_id)
    .bind(&required_types)
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Service>> {
    let row = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, name, base_price, branch_id, required_types, sort_order, is_active, created_at, updated_at FROM service WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ServiceRow::into_service))
}

pub async fn create_variant(
    pool: &SqlitePool,
    data: ServiceVariantCreate,
) -> RepoResult<ServiceVariant> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO service_variant (id, service_id, variant_type, name, code, price_modifier, sort_order, is_active, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
    )
    .bind(id)
    .bind(data.service_id)
    .bind(data.variant_type.as_str())
    .bind(&data.name)
    .bind(&data.code)
    .bind(data.price_modifier)
    .bind(data.sort_order.unwrap_or(0))
    .bind(&data.metadata)
    .execute(pool)
    .await
    .map_err(|e| {
        let msg = e.to_string();
        if msg.to_lowercase().contains("unique") {
            RepoError::Duplicate(format!(
                "Active {} variant '{}' already exists for service {}",
                data.variant_type, data.name, data.service_id
            ))
        } else {
            RepoError::Database(msg)
        }
    })?;

    find_variant_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create variant".into()))
}

pub async fn find_variant_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ServiceVariant>> {
    let row = sqlx::query_as::<_, VariantRow>(
        "SELECT id, service_id, variant_type, name, code, price_modifier, sort_order, is_active, metadata FROM service_variant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.and_then(VariantRow::into_variant))
}

/// Soft-delete a variant. Historical snapshots referencing it are
/// unaffected — they never consult the catalog again.
pub async fn deactivate_variant(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE service_variant SET is_active = 0 WHERE id = ? AND is_active = 1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Update a variant's price modifier (catalog edits race only against new
/// price computations, never against written snapshots)
pub async fn update_variant_price(pool: &SqlitePool, id: i64, price_modifier: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE service_variant SET price_modifier = ? WHERE id = ?")
        .bind(price_modifier)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Fetch a service with its active variants, ordered for display.
/// This is the pricing path's single read.
pub async fn fetch_with_variants(
    pool: &SqlitePool,
    service_id: i64,
) -> RepoResult<Option<ServiceWithVariants>> {
    let Some(service) = find_by_id(pool, service_id).await? else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, VariantRow>(
        "SELECT id, service_id, variant_type, name, code, price_modifier, sort_order, is_active, metadata FROM service_variant WHERE service_id = ? AND is_active = 1 ORDER BY variant_type, sort_order",
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    let variants = rows.into_iter().filter_map(VariantRow::into_variant).collect();
    Ok(Some(ServiceWithVariants { service, variants }))
}
