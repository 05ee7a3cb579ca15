//! Love Sandwiches — market sales ledger automation
//!
//! Entry point. Loads configuration, initialises structured logging,
//! connects to the spreadsheet, and runs one sales → surplus → stock
//! projection cycle against the operator's console.

use anyhow::Result;
use secrecy::SecretString;
use tracing::{error, info};

use sandwich_ledger::calc::projection::{ProjectionConfig, StockProjector};
use sandwich_ledger::config;
use sandwich_ledger::engine::cycle::{run_cycle, CycleReport};
use sandwich_ledger::ledger::sheets::GoogleSheetsLedger;
use sandwich_ledger::ledger::Ledger;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load(CONFIG_PATH)?;

    init_logging();

    println!("Welcome to Love Sandwiches Data Automation");

    let token = config::AppConfig::resolve_env(&cfg.ledger.access_token_env)?;
    let ledger = GoogleSheetsLedger::connect(&cfg.ledger, SecretString::new(token)).await?;
    info!(
        ledger = ledger.name(),
        spreadsheet_id = ledger.spreadsheet_id(),
        "Ledger connected"
    );

    let projector = StockProjector::new(ProjectionConfig::from(&cfg.projection));

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    match run_cycle(&ledger, &projector, cfg.ledger.header_rows, &mut input, &mut out).await {
        Ok(report) => {
            log_cycle_report(&report);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Cycle failed");
            Err(e)
        }
    }
}

fn log_cycle_report(report: &CycleReport) {
    info!(
        sales = %report.sales,
        surplus = %report.surplus,
        projected = %report.projected,
        at = %report.timestamp,
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber. Logs go to stderr; stdout is the
/// operator console.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sandwich_ledger=info"));

    let json_logging = std::env::var("SANDWICH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
