use anyhow::Context;
use clap::Parser;
use multisend_auditor::datasource::{load_address_book, load_payouts};
use multisend_auditor::orchestration::{render_report, Auditor};
use multisend_auditor::{
    AppError, Config, ReconciliationPolicy, SafeClientSource, TransactionSource, Verdict,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Audit a multisend payout transaction and write the transfer ledger.
#[derive(Parser, Debug)]
#[clap(version)]
struct Cli {
    /// Transaction-service id of the multisend transaction
    #[clap(value_parser)]
    tx_id: String,
    /// Payout plan CSV to reconcile against
    #[clap(long, value_parser)]
    payouts: Option<PathBuf>,
    /// Address book CSV (overrides ADDRESS_BOOK_PATH)
    #[clap(long, value_parser)]
    address_book: Option<PathBuf>,
    /// Ledger output path (overrides LEDGER_PATH)
    #[clap(long, value_parser)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(verdict) => {
            tracing::info!("{}", verdict);
        }
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(AppError::Validation(aborted)) => {
                    print!(
                        "{}",
                        render_report(&aborted.diagnostics, Verdict::RequiresInvestigation)
                    );
                    eprintln!("{}", aborted);
                    std::process::exit(2);
                }
                Some(app_error) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(app_error.exit_code());
                }
                None => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Verdict> {
    let config = Config::from_env().map_err(AppError::from)?;

    let address_book_path = cli
        .address_book
        .unwrap_or_else(|| PathBuf::from(&config.address_book_path));
    let registry = load_address_book(&address_book_path)
        .map_err(AppError::from)
        .with_context(|| format!("loading {}", address_book_path.display()))?;

    let payouts = match &cli.payouts {
        Some(path) => Some(load_payouts(path).map_err(AppError::from)?),
        None => None,
    };

    let source: Arc<dyn TransactionSource> = Arc::new(SafeClientSource::new(
        config.safe_client_url.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    ));
    let auditor = Auditor::new(
        source,
        Arc::new(registry),
        ReconciliationPolicy::from_config(&config),
    );

    let ledger_path = cli.out.unwrap_or_else(|| PathBuf::from(&config.ledger_path));
    let outcome = auditor
        .run(&cli.tx_id, payouts.as_deref(), &ledger_path)
        .await?;

    let verdict = outcome.result.verdict();
    print!("{}", render_report(&outcome.result.diagnostics, verdict));
    Ok(verdict)
}
