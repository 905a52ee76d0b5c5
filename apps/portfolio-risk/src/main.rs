//! Portfolio Risk Binary
//!
//! Analyzes one portfolio snapshot and prints the risk analysis as JSON.
//!
//! # Usage
//!
//! ```bash
//! portfolio-risk <portfolio.json> [config.yaml]
//! ```
//!
//! A portfolio without an `id` is analyzed under a generated UUID.
//!
//! # Environment Variables
//!
//! - `PORTFOLIO_RISK_CONFIG`: config file path, used when no second argument
//!   is given (defaults apply when neither is set)
//! - `RUST_LOG`: log filter, overrides `observability.logging.level`

use std::process::ExitCode;

use anyhow::{Context, bail};
use portfolio_risk::config::{Config, load_config};
use portfolio_risk::telemetry::init_tracing;
use portfolio_risk::{Portfolio, PortfolioRiskAnalyzer, RiskAnalysisError};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "PORTFOLIO_RISK_CONFIG";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if let Some(err) = e.downcast_ref::<RiskAnalysisError>()
                && let Ok(body) = serde_json::to_string(&err.to_response())
            {
                eprintln!("{body}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(portfolio_path) = args.next() else {
        bail!("usage: portfolio-risk <portfolio.json> [config.yaml]");
    };
    let config_path = args.next().or_else(|| std::env::var(CONFIG_ENV).ok());

    let config = match &config_path {
        Some(path) => load_config(path).with_context(|| format!("loading config {path}"))?,
        None => Config::default(),
    };

    init_tracing(&config.observability.logging).context("initializing logging")?;

    tracing::info!(
        portfolio = %portfolio_path,
        config = config_path.as_deref().unwrap_or("<defaults>"),
        "Starting portfolio risk analysis"
    );

    let raw = std::fs::read_to_string(&portfolio_path)
        .with_context(|| format!("reading portfolio {portfolio_path}"))?;
    let portfolio: Portfolio = serde_json::from_str(&raw)
        .with_context(|| format!("parsing portfolio {portfolio_path}"))?;
    tracing::debug!(portfolio_id = %portfolio.id, "Parsed portfolio");

    let analysis = PortfolioRiskAnalyzer::new(config.analysis)
        .analyze(&portfolio)
        .with_context(|| format!("analyzing portfolio {}", portfolio.id))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&analysis).context("serializing analysis")?
    );

    Ok(())
}
