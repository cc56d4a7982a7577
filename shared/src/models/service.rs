//! Service & Variant Models

use serde::{Deserialize, Serialize};

/// Selectable variant group on a service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    Size,
    Color,
    Position,
    Style,
    Complexity,
    DesignFee,
}

impl VariantType {
    pub const ALL: [VariantType; 6] = [
        VariantType::Size,
        VariantType::Color,
        VariantType::Position,
        VariantType::Style,
        VariantType::Complexity,
        VariantType::DesignFee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Size => "size",
            VariantType::Color => "color",
            VariantType::Position => "position",
            VariantType::Style => "style",
            VariantType::Complexity => "complexity",
            VariantType::DesignFee => "design_fee",
        }
    }

    pub fn parse(s: &str) -> Option<VariantType> {
        VariantType::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service entity (刺青項目)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    /// Base list price in minor currency units
    pub base_price: i64,
    /// Owning branch. Opaque identifier — display names can repeat across
    /// branches upstream, so nothing here compares branches by name.
    pub branch_id: Option<String>,
    /// Variant groups that must carry a selection at pricing time
    pub required_types: Vec<VariantType>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub base_price: i64,
    pub branch_id: Option<String>,
    pub required_types: Option<Vec<VariantType>>,
    pub sort_order: Option<i32>,
}

/// Service variant entity
///
/// `metadata` carries the raw pricing-override JSON exactly as stored;
/// it is parsed once into a [`VariantPricing`] when a catalog is built,
/// never inspected ad hoc at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceVariant {
    pub id: i64,
    pub service_id: i64,
    pub variant_type: VariantType,
    pub name: String,
    pub code: String,
    /// Price delta in minor currency units (positive=add, negative=subtract)
    pub price_modifier: i64,
    pub sort_order: i32,
    pub is_active: bool,
    /// Raw override metadata (wire schema: [`ColorPricingMeta`])
    pub metadata: Option<String>,
}

impl ServiceVariant {
    /// Parse this variant's metadata into its closed pricing rule.
    ///
    /// Only color variants carry the override schema; absent or
    /// malformed metadata degrades to `Flat` — historical rows predating
    /// the schema must keep pricing.
    pub fn pricing_rule(&self) -> VariantPricing {
        if self.variant_type != VariantType::Color {
            return VariantPricing::Flat(self.price_modifier);
        }
        match self
            .metadata
            .as_deref()
            .and_then(|raw| serde_json::from_str::<ColorPricingMeta>(raw).ok())
        {
            Some(meta) => VariantPricing::SizeRelative {
                diff: meta.color_price_diff,
                exclude_sizes: meta.exclude_sizes,
                excluded_price: meta.z_color_price,
            },
            None => VariantPricing::Flat(self.price_modifier),
        }
    }
}

/// Create variant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceVariantCreate {
    pub service_id: i64,
    pub variant_type: VariantType,
    pub name: String,
    pub code: String,
    pub price_modifier: i64,
    pub sort_order: Option<i32>,
    pub metadata: Option<String>,
}

/// Color-override metadata wire schema (JSON attached to a color variant)
///
/// The color's contribution is derived from the concurrently selected
/// size: `size.price_modifier + color_price_diff`, except for sizes named
/// in `exclude_sizes`, which pay the flat `z_color_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPricingMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub color_price_diff: i64,
    #[serde(default)]
    pub exclude_sizes: Vec<String>,
    pub z_color_price: i64,
}

/// Closed pricing rule, parsed once from variant metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantPricing {
    /// Contribution is the variant's own price modifier
    Flat(i64),
    /// Contribution is derived from the selected size's modifier
    SizeRelative {
        diff: i64,
        exclude_sizes: Vec<String>,
        excluded_price: i64,
    },
}
