//! Price Breakdown Decoding
//!
//! Rebuilds a display-ready decomposition from a bill item's frozen
//! fields alone. The live catalog is deliberately out of reach here —
//! the referenced variants may have been repriced or deleted since
//! billing, and historical invoices must not move.
//!
//! Decoding never fails: malformed or unexpected snapshot fields are
//! dropped where they stand, not defaulted to zero-amount addons.

use serde_json::Value;
use shared::billing::{AddonLine, BillItemSnapshot, PriceBreakdown};
use shared::models::AppointmentBillItem;

/// Selection keys that never carry money — raw names frozen from the
/// cart. `side` and `technique` only appear in older snapshots.
const NON_MONETARY_KEYS: [&str; 7] = [
    "side",
    "color",
    "size",
    "position",
    "style",
    "complexity",
    "technique",
];

/// Fixed invoice labels for the known fee keys
const CUSTOM_ADDON_LABEL: &str = "加購";
const DESIGN_FEE_LABEL: &str = "設計費";

/// Parse a positive integer-like amount from a snapshot value.
///
/// Numbers and numeric strings round to the nearest integer; anything
/// else, and any non-positive result, is `None`.
fn parse_amount(value: &Value) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if !parsed.is_finite() {
        return None;
    }
    let rounded = parsed.round() as i64;
    (rounded > 0).then_some(rounded)
}

/// Decode a frozen bill item into its display decomposition.
pub fn decode_breakdown(snapshot: &BillItemSnapshot) -> PriceBreakdown {
    let variants = &snapshot.variants;

    let color = variants
        .get("color")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from);

    // Strip the "-<color>" suffix checkout composed into the name; keep
    // the full name when it doesn't match (hand-edited legacy rows)
    let service_name = match &color {
        Some(c) => snapshot
            .name_snapshot
            .strip_suffix(&format!("-{c}"))
            .unwrap_or(&snapshot.name_snapshot)
            .to_string(),
        None => snapshot.name_snapshot.clone(),
    };

    let mut addons = Vec::new();

    // Known fee keys first, in fixed order: 加購 before 設計費
    if let Some(amount) = variants.get("custom_addon").and_then(parse_amount) {
        addons.push(AddonLine {
            key: "custom_addon".to_string(),
            label: CUSTOM_ADDON_LABEL.to_string(),
            amount,
        });
    }
    if let Some(amount) = variants.get("design_fee").and_then(parse_amount) {
        addons.push(AddonLine {
            key: "design_fee".to_string(),
            label: DESIGN_FEE_LABEL.to_string(),
            amount,
        });
    }

    // Any other numeric key decodes as a generic addon labeled by its
    // key, alphabetically after the known fees
    let mut generic: Vec<AddonLine> = variants
        .iter()
        .filter(|(key, _)| {
            let key = key.as_str();
            key != "custom_addon" && key != "design_fee" && !NON_MONETARY_KEYS.contains(&key)
        })
        .filter_map(|(key, value)| {
            parse_amount(value).map(|amount| AddonLine {
                key: key.clone(),
                label: key.clone(),
                amount,
            })
        })
        .collect();
    generic.sort_by(|a, b| a.key.cmp(&b.key));
    addons.extend(generic);

    let addons_total: i64 = addons.iter().map(|a| a.amount).sum();
    // Clamp: inconsistent legacy snapshots must not show a negative
    // service price
    let service_price = (snapshot.final_price_snapshot - addons_total).max(0);

    PriceBreakdown {
        service_name,
        color,
        final_price: snapshot.final_price_snapshot,
        service_price,
        addons,
        addons_total,
    }
}

/// Convenience: decode straight from a stored bill item row
pub fn decode_bill_item(item: &AppointmentBillItem) -> PriceBreakdown {
    decode_breakdown(&BillItemSnapshot {
        name_snapshot: item.name_snapshot.clone(),
        final_price_snapshot: item.final_price_snapshot,
        variants: item.variants(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(name: &str, final_price: i64, variants: Value) -> BillItemSnapshot {
        let variants = match variants {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        BillItemSnapshot {
            name_snapshot: name.to_string(),
            final_price_snapshot: final_price,
            variants,
        }
    }

    #[test]
    fn test_plain_service_with_color() {
        let s = snapshot(
            "圖騰小圖案-彩色",
            3000,
            json!({ "color": "彩色", "size": "T-1" }),
        );
        let b = decode_breakdown(&s);
        assert_eq!(b.service_name, "圖騰小圖案");
        assert_eq!(b.color.as_deref(), Some("彩色"));
        assert_eq!(b.service_price, 3000);
        assert_eq!(b.addons_total, 0);
        assert!(b.addons.is_empty());
    }

    #[test]
    fn test_fee_keys_decode_in_fixed_order() {
        let s = snapshot(
            "肖像",
            2700,
            json!({ "design_fee": 500, "custom_addon": 200 }),
        );
        let b = decode_breakdown(&s);
        assert_eq!(b.addons.len(), 2);
        assert_eq!(b.addons[0].key, "custom_addon");
        assert_eq!(b.addons[0].label, "加購");
        assert_eq!(b.addons[0].amount, 200);
        assert_eq!(b.addons[1].key, "design_fee");
        assert_eq!(b.addons[1].label, "設計費");
        assert_eq!(b.addons[1].amount, 500);
        assert_eq!(b.addons_total, 700);
        assert_eq!(b.service_price, 2000);
        assert_eq!(b.final_price, 2700);
    }

    #[test]
    fn test_numeric_strings_round_to_integers() {
        let s = snapshot(
            "肖像",
            2700,
            json!({ "design_fee": "500", "custom_addon": " 199.6 " }),
        );
        let b = decode_breakdown(&s);
        assert_eq!(b.addons[0].amount, 200);
        assert_eq!(b.addons[1].amount, 500);
    }

    #[test]
    fn test_generic_keys_sort_after_known_fees() {
        let s = snapshot(
            "肖像",
            5000,
            json!({ "touch_up": 300, "aftercare": "150", "design_fee": 500 }),
        );
        let b = decode_breakdown(&s);
        let keys: Vec<&str> = b.addons.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["design_fee", "aftercare", "touch_up"]);
        assert_eq!(b.addons[1].label, "aftercare");
        assert_eq!(b.addons_total, 950);
    }

    #[test]
    fn test_non_monetary_keys_are_skipped() {
        let s = snapshot(
            "圖騰",
            1000,
            json!({
                "side": "left", "size": "T-1", "position": "手臂",
                "style": "寫實", "complexity": "複雜", "technique": "線條"
            }),
        );
        let b = decode_breakdown(&s);
        assert!(b.addons.is_empty());
        assert_eq!(b.service_price, 1000);
    }

    #[test]
    fn test_unparseable_values_are_omitted_not_zeroed() {
        let s = snapshot(
            "圖騰",
            1000,
            json!({
                "custom_addon": "free", "design_fee": null,
                "notes": true, "deposit": [100]
            }),
        );
        let b = decode_breakdown(&s);
        assert!(b.addons.is_empty());
        assert_eq!(b.addons_total, 0);
        assert_eq!(b.service_price, 1000);
    }

    #[test]
    fn test_non_positive_amounts_are_omitted() {
        let s = snapshot("圖騰", 1000, json!({ "custom_addon": 0, "design_fee": -50 }));
        let b = decode_breakdown(&s);
        assert!(b.addons.is_empty());
    }

    #[test]
    fn test_service_price_clamps_at_zero() {
        // legacy snapshot whose fees exceed the recorded final price
        let s = snapshot("圖騰", 400, json!({ "design_fee": 500 }));
        let b = decode_breakdown(&s);
        assert_eq!(b.addons_total, 500);
        assert_eq!(b.service_price, 0);
    }

    #[test]
    fn test_name_without_matching_color_suffix_is_kept() {
        let s = snapshot("圖騰小圖案", 1000, json!({ "color": "彩色" }));
        let b = decode_breakdown(&s);
        assert_eq!(b.service_name, "圖騰小圖案");
        assert_eq!(b.color.as_deref(), Some("彩色"));
    }

    #[test]
    fn test_empty_or_non_string_color_is_none() {
        let b = decode_breakdown(&snapshot("圖騰", 1000, json!({ "color": "" })));
        assert_eq!(b.color, None);

        let b = decode_breakdown(&snapshot("圖騰", 1000, json!({ "color": 3 })));
        assert_eq!(b.color, None);
    }

    #[test]
    fn test_empty_snapshot_never_raises() {
        let b = decode_breakdown(&snapshot("", 0, json!({})));
        assert_eq!(b.service_name, "");
        assert_eq!(b.service_price, 0);
        assert!(b.addons.is_empty());
    }

    #[test]
    fn test_round_trip_final_price_identity() {
        // service_price + addons_total reproduces the frozen final price
        let s = snapshot(
            "圖騰小圖案-彩色",
            6200,
            json!({ "color": "彩色", "size": "T-1", "design_fee": 500, "custom_addon": 200 }),
        );
        let b = decode_breakdown(&s);
        assert_eq!(b.service_price + b.addons_total, b.final_price);
    }
}
