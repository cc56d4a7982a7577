//! Recompute member spend totals from the payment ledger.
//!
//! Idempotent: re-running converges to the same totals, and members
//! whose stored value already matches see no write. Voided bills are
//! excluded. The job refuses to start without `--yes`, and refuses
//! production-like targets without `--allow-production`.

use clap::Parser;
use studio_billing::aggregator;
use studio_billing::aggregator::guard::{JobConfirmation, ensure_confirmed};
use studio_billing::core::Config;
use studio_billing::db::DbService;
use studio_billing::utils::logger;

#[derive(Parser, Debug)]
#[command(
    name = "recompute-spent",
    about = "Rebuild member total_spent from the payment ledger"
)]
struct Args {
    /// SQLite database path (overrides STUDIO_DB)
    #[arg(long, env = "STUDIO_DB")]
    database: Option<String>,

    /// Confirm that the recompute should run
    #[arg(long)]
    yes: bool,

    /// Acknowledge that the target store is production-like
    #[arg(long)]
    allow_production: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env();
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    let database = args.database.unwrap_or(config.database_path);

    // Guard runs before any connection is opened — refusal means nothing
    // was touched
    let confirmation = JobConfirmation {
        proceed: args.yes,
        allow_production: args.allow_production,
    };
    if let Err(e) = ensure_confirmed(&database, confirmation) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let db = DbService::new(&database).await?;
    let report = aggregator::recompute_total_spent(&db.pool).await?;

    println!(
        "processed={} updated={} failed={}",
        report.processed, report.updated, report.failed
    );
    Ok(())
}
