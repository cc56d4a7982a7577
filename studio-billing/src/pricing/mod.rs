//! Pricing Engine
//!
//! Pure computation: a service's variant catalog plus a selection set in,
//! a deterministic price quote out. Persistence stays outside; the same
//! functions price cart items during shopping and feed the checkout
//! snapshot writer.

pub mod catalog;
pub mod resolver;

pub use catalog::VariantCatalog;
pub use resolver::resolve_price;
