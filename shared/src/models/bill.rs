//! Appointment Bill Models
//!
//! Bill items are written once at checkout and never updated: the
//! `*_snapshot` columns are the permanent record a historical invoice is
//! rebuilt from, regardless of later catalog edits or variant deletions.

use serde::{Deserialize, Serialize};

/// Bill status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    #[default]
    Active,
    Completed,
    Void,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Active => "ACTIVE",
            BillStatus::Completed => "COMPLETED",
            BillStatus::Void => "VOID",
        }
    }

    pub fn parse(s: &str) -> Option<BillStatus> {
        match s {
            "ACTIVE" => Some(BillStatus::Active),
            "COMPLETED" => Some(BillStatus::Completed),
            "VOID" => Some(BillStatus::Void),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment bill entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentBill {
    pub id: i64,
    pub customer_id: i64,
    /// Opaque branch identifier — never compared by display name
    pub branch_id: Option<String>,
    pub status: BillStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AppointmentBill {
    /// VOID bills never contribute to spend aggregation
    pub fn is_void(&self) -> bool {
        self.status == BillStatus::Void
    }
}

/// Billed line item — immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AppointmentBillItem {
    pub id: i64,
    pub bill_id: i64,
    /// Composed display name frozen at billing time, e.g. "圖騰小圖案-彩色"
    pub name_snapshot: String,
    /// Final price frozen at billing time (minor units)
    pub final_price_snapshot: i64,
    /// Raw selection values plus computed addon amounts, as a flat JSON map
    pub variants_snapshot: String,
    pub created_at: i64,
}

impl AppointmentBillItem {
    /// Parse the frozen variant map. Historical rows may hold anything;
    /// unparseable JSON yields an empty map rather than an error.
    pub fn variants(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::from_str(&self.variants_snapshot).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_status_round_trips() {
        for s in [BillStatus::Active, BillStatus::Completed, BillStatus::Void] {
            assert_eq!(BillStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(BillStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn corrupt_variants_snapshot_yields_empty_map() {
        let item = AppointmentBillItem {
            id: 1,
            bill_id: 1,
            name_snapshot: "x".into(),
            final_price_snapshot: 100,
            variants_snapshot: "{broken".into(),
            created_at: 0,
        };
        assert!(item.variants().is_empty());
    }
}
