//! Variant Catalog
//!
//! In-memory view of one service's active variants, grouped by variant
//! type for pricing. Metadata overrides are parsed exactly once at
//! construction into [`VariantPricing`] — resolution never touches raw
//! JSON.

use shared::models::{Service, ServiceVariant, VariantPricing, VariantType};
use std::collections::HashMap;

/// One active variant with its pricing rule ready
#[derive(Debug, Clone)]
pub struct CatalogVariant {
    pub name: String,
    pub price_modifier: i64,
    pub rule: VariantPricing,
}

/// A service's active variants, indexed for lookup by (type, name)
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    service: Service,
    groups: HashMap<VariantType, Vec<CatalogVariant>>,
}

impl VariantCatalog {
    /// Build from fetched rows. Inactive variants are excluded here so
    /// every later lookup only ever sees selectable entries.
    pub fn new(service: Service, variants: Vec<ServiceVariant>) -> Self {
        let mut groups: HashMap<VariantType, Vec<CatalogVariant>> = HashMap::new();
        for variant in variants.into_iter().filter(|v| v.is_active) {
            let rule = variant.pricing_rule();
            groups.entry(variant.variant_type).or_default().push(CatalogVariant {
                name: variant.name,
                price_modifier: variant.price_modifier,
                rule,
            });
        }
        Self { service, groups }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Look up an active variant by group and name
    pub fn find(&self, variant_type: VariantType, name: &str) -> Option<&CatalogVariant> {
        self.groups.get(&variant_type)?.iter().find(|v| v.name == name)
    }

    /// Price contribution of a selected variant.
    ///
    /// `selected_size` is the already-resolved size selection: a
    /// size-relative color derives its price from it. Without a size to
    /// reference, the override degrades to the color's own raw modifier
    /// so pricing keeps working.
    pub fn contribution(
        &self,
        variant: &CatalogVariant,
        selected_size: Option<&CatalogVariant>,
    ) -> i64 {
        match &variant.rule {
            VariantPricing::Flat(amount) => *amount,
            VariantPricing::SizeRelative {
                diff,
                exclude_sizes,
                excluded_price,
            } => match selected_size {
                None => variant.price_modifier,
                Some(size) if exclude_sizes.contains(&size.name) => *excluded_price,
                Some(size) => size.price_modifier + diff,
            },
        }
    }
}
