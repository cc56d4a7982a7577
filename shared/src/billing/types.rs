//! Shared value types for pricing and billing
//!
//! These cross the boundary between the pricing engine, the checkout
//! writer and the breakdown decoder. Monetary amounts are `i64` minor
//! currency units throughout.

use crate::models::VariantType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variant selections for one cart line
///
/// `choices` maps a variant group to the selected variant's name (names,
/// not IDs — the same values are later frozen verbatim into the bill-item
/// snapshot). `design_fee` / `custom_addon` are free-form amounts added
/// on top of catalog-derived modifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantSelection {
    #[serde(default)]
    pub choices: BTreeMap<VariantType, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_fee: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_addon: Option<i64>,
}

impl VariantSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for tests and callers composing selections
    pub fn choose(mut self, variant_type: VariantType, name: impl Into<String>) -> Self {
        self.choices.insert(variant_type, name.into());
        self
    }

    pub fn with_design_fee(mut self, amount: i64) -> Self {
        self.design_fee = Some(amount);
        self
    }

    pub fn with_custom_addon(mut self, amount: i64) -> Self {
        self.custom_addon = Some(amount);
        self
    }

    pub fn get(&self, variant_type: VariantType) -> Option<&str> {
        self.choices.get(&variant_type).map(|s| s.as_str())
    }
}

/// One applied price modifier in a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedModifier {
    /// Variant group code, or `design_fee` / `custom_addon` for free-form
    /// amounts
    pub kind: String,
    /// Selected variant name (free-form amounts repeat the kind here)
    pub name: String,
    /// Contribution in minor currency units
    pub amount: i64,
}

/// Resolver output: a deterministic price decomposition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub base_price: i64,
    pub modifiers: Vec<AppliedModifier>,
    /// Always `base_price + Σ modifiers.amount`
    pub final_price: i64,
}

impl PriceQuote {
    pub fn modifier_total(&self) -> i64 {
        self.modifiers.iter().map(|m| m.amount).sum()
    }
}

/// Cart line priced during shopping — discarded at checkout, superseded
/// by the bill-item snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub selection: VariantSelection,
    pub base_price: i64,
    pub final_price: i64,
    pub created_at: i64,
}

/// The frozen fields of a bill item a breakdown is decoded from
///
/// Deliberately catalog-free: decoding must work for snapshots whose
/// variants were edited or deleted long ago.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItemSnapshot {
    pub name_snapshot: String,
    pub final_price_snapshot: i64,
    #[serde(default)]
    pub variants: serde_json::Map<String, serde_json::Value>,
}

/// One addon line in a decoded breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddonLine {
    pub key: String,
    pub label: String,
    pub amount: i64,
}

/// Display-ready decomposition reconstructed from a snapshot alone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub service_name: String,
    pub color: Option<String>,
    pub final_price: i64,
    /// `max(0, final_price - addons_total)` — clamped so inconsistent
    /// legacy snapshots can't show a negative service price
    pub service_price: i64,
    pub addons: Vec<AddonLine>,
    pub addons_total: i64,
}
