//! Batch-job safety guard
//!
//! The spend recompute mutates member rows in place, so it must never
//! run against a production store by accident. The guard inspects the
//! configured connection descriptor for known production-hosting
//! markers; a match demands a second, stronger acknowledgement on top of
//! the basic confirmation. Refusal happens before any connection is
//! opened — no partial execution.

use shared::BillingError;

/// Connection-descriptor substrings that indicate a production-hosted
/// store: managed database hosts and conventional deploy locations.
const PRODUCTION_MARKERS: [&str; 9] = [
    "prod",
    "amazonaws.com",
    "rds.",
    "azure.com",
    "mongodb.net",
    "supabase.",
    "render.com",
    "railway.app",
    "/var/lib/",
];

/// Operator confirmation supplied on invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct JobConfirmation {
    /// Basic "proceed" acknowledgement
    pub proceed: bool,
    /// "I understand this targets a production-like store"
    pub allow_production: bool,
}

/// Classify a connection descriptor (URL or path) as production-like
pub fn is_production_like(descriptor: &str) -> bool {
    let lowered = descriptor.to_lowercase();
    PRODUCTION_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Refuse to run unless the required confirmations are present
pub fn ensure_confirmed(
    descriptor: &str,
    confirmation: JobConfirmation,
) -> Result<(), BillingError> {
    if !confirmation.proceed {
        return Err(BillingError::ProductionGuard(
            "spend recompute requires explicit confirmation (--yes)".to_string(),
        ));
    }
    if is_production_like(descriptor) && !confirmation.allow_production {
        return Err(BillingError::ProductionGuard(format!(
            "'{descriptor}' looks production-hosted; pass --allow-production to acknowledge"
        )));
    }
    Ok(())
}
