//! Studio Billing Core — 多分店刺青工作室計價與帳務核心
//!
//! # Architecture overview
//!
//! The subsystem with real design weight is the pricing &
//! billing-reconciliation pipeline:
//!
//! - **Catalog** (`pricing::catalog`): a service's active variants with
//!   their pricing rules parsed from metadata, once
//! - **Resolver** (`pricing::resolver`): pure, deterministic price
//!   computation over a selection set
//! - **Checkout** (`billing::checkout`): freezes resolver output into
//!   immutable bill-item snapshots, atomically
//! - **Breakdown** (`billing::breakdown`): rebuilds invoice lines from a
//!   snapshot alone — the live catalog is never consulted again
//! - **Ledger** (`db::repository::payment`): append-only payments and
//!   allocations
//! - **Aggregator** (`aggregator`): guarded, idempotent batch recompute
//!   of member spend totals
//!
//! # Module structure
//!
//! ```text
//! studio-billing/src/
//! ├── core/          # 配置
//! ├── utils/         # logging setup
//! ├── db/            # SQLite pool + repositories
//! ├── pricing/       # catalog + resolver
//! ├── billing/       # checkout snapshot writer + breakdown decoding
//! ├── aggregator/    # spend recompute batch job + production guard
//! └── bin/           # recompute-spent operator binary
//! ```

pub mod aggregator;
pub mod billing;
pub mod core;
pub mod db;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use billing::breakdown::decode_breakdown;
pub use billing::checkout::{CheckoutLine, checkout_bill_items, price_cart_item};
pub use db::DbService;
pub use self::core::Config;
pub use pricing::catalog::VariantCatalog;
pub use pricing::resolver::resolve_price;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
