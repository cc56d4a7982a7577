//! Billing — snapshot writing and invoice reconstruction
//!
//! `checkout` freezes resolved prices into bill items; `breakdown`
//! rebuilds display decompositions from those frozen records. The two
//! never share catalog state: once written, a snapshot is on its own.

pub mod breakdown;
pub mod checkout;

pub use breakdown::decode_breakdown;
pub use checkout::{CheckoutLine, checkout_bill_items, price_cart_item};
