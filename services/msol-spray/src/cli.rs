//! Command-line interface

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use common::Secret;
use spray_pool::{MAX_WORKERS, OutputFormat};
use tracing::info;

use crate::error::{Error, Result};
use crate::inputs;

#[derive(Parser, Debug)]
#[command(
    name = "msolspray",
    author,
    version,
    about = "Azure AD password spraying for authorized assessments"
)]
#[command(group(ArgGroup::new("secret").required(true).args(["password_file", "password"])))]
pub struct Cli {
    /// File containing email addresses to spray, one per line
    #[arg(short = 'u', long = "users")]
    pub users: PathBuf,

    /// File whose first line is the password to spray
    #[arg(short = 'p', long = "password-file")]
    pub password_file: Option<PathBuf>,

    /// Password to spray
    #[arg(short = 'P', long = "password")]
    pub password: Option<String>,

    /// Append every outcome line to this file
    #[arg(short = 'o', long = "outfile")]
    pub outfile: Option<PathBuf>,

    /// Emit one JSON object per outcome (and JSON logs)
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Log progress to stderr (ignored with --json)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Concurrent workers, at most 3
    #[arg(
        short = 'w',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub workers: u16,

    /// TOML config file (falls back to MSOLSPRAY_CONFIG)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    /// Default log level when neither LOG_LEVEL nor RUST_LOG is set.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose && !self.json { "info" } else { "warn" }
    }

    /// Requested worker count reduced to the pool maximum.
    pub fn effective_workers(&self) -> usize {
        let requested = usize::from(self.workers);
        if requested > MAX_WORKERS {
            info!(requested, max = MAX_WORKERS, "reducing worker count");
            return MAX_WORKERS;
        }
        requested
    }

    /// The password to spray, from the flag or the first line of the file.
    pub fn load_password(&self) -> Result<Secret<String>> {
        match (&self.password, &self.password_file) {
            (Some(password), _) => Ok(Secret::new(password.clone())),
            (None, Some(path)) => inputs::load_password(path),
            (None, None) => Err(Error::NoPassword),
        }
    }
}
