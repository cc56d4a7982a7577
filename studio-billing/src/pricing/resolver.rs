//! Price Resolver
//!
//! Pure function from (catalog, selection) to a price quote. No clock,
//! no randomness, no hidden state: identical catalog and selection
//! always produce the identical quote, which is what makes the frozen
//! checkout snapshots trustworthy.

use super::catalog::VariantCatalog;
use shared::billing::{AppliedModifier, PriceQuote, VariantSelection};
use shared::error::ValidationError;
use shared::models::VariantType;

/// Mandated resolution order: size first (its modifier is the input to
/// the color override), then color, then the remaining groups
/// independently.
const RESOLUTION_ORDER: [VariantType; 6] = [
    VariantType::Size,
    VariantType::Color,
    VariantType::Position,
    VariantType::Style,
    VariantType::Complexity,
    VariantType::DesignFee,
];

/// Resolve a selection set against a service's catalog.
///
/// Returns a quote with `final_price = base_price + Σ modifiers.amount`.
/// Fails with `MissingVariant` when a required group has no selection and
/// `InvalidVariant` when a selection names an inactive or unknown
/// variant; both block cart and bill creation.
pub fn resolve_price(
    catalog: &VariantCatalog,
    selection: &VariantSelection,
) -> Result<PriceQuote, ValidationError> {
    for required in &catalog.service().required_types {
        if selection.get(*required).is_none_or(str::is_empty) {
            return Err(ValidationError::MissingVariant(required.to_string()));
        }
    }

    let mut modifiers = Vec::new();
    let mut selected_size = None;

    for variant_type in RESOLUTION_ORDER {
        let Some(name) = selection.get(variant_type) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let Some(variant) = catalog.find(variant_type, name) else {
            return Err(ValidationError::InvalidVariant {
                variant_type: variant_type.to_string(),
                name: name.to_string(),
            });
        };
        let amount = catalog.contribution(variant, selected_size);
        if variant_type == VariantType::Size {
            selected_size = Some(variant);
        }
        modifiers.push(AppliedModifier {
            kind: variant_type.as_str().to_string(),
            name: variant.name.clone(),
            amount,
        });
    }

    // Free-form amounts go straight onto the quote
    if let Some(fee) = selection.design_fee.filter(|v| *v > 0) {
        modifiers.push(AppliedModifier {
            kind: "design_fee".to_string(),
            name: "design_fee".to_string(),
            amount: fee,
        });
    }
    if let Some(addon) = selection.custom_addon.filter(|v| *v > 0) {
        modifiers.push(AppliedModifier {
            kind: "custom_addon".to_string(),
            name: "custom_addon".to_string(),
            amount: addon,
        });
    }

    let base_price = catalog.service().base_price;
    let final_price = base_price + modifiers.iter().map(|m| m.amount).sum::<i64>();

    Ok(PriceQuote {
        base_price,
        modifiers,
        final_price,
    })
}
