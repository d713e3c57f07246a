// SPDX-License-Identifier: Apache-2.0

//! rbtriage - triage Rollbar issues from the terminal.
//!
//! Lists active and recently seen issues, shows the main error of an
//! issue and changes its state, with tokens kept in a local project store.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod provider;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use rbtriage_core::{AppConfig, TokenProvider, config, redact_str};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::cli::{Cli, OutputContext};
use crate::provider::CliTokenProvider;

/// Prints help, version or a usage error. Usage errors exit with 1 like
/// every other failure.
fn usage_exit(error: &clap::Error) -> ExitCode {
    let _ = error.print();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn load_config() -> Result<AppConfig> {
    let config = config::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(&e),
    };
    logging::init_logging(cli.verbose);

    let provider = CliTokenProvider::from_env(cli.token.clone(), cli.project.clone());

    let result = match load_config() {
        Ok(config) => {
            let ctx = OutputContext::from_cli(cli.format, cli.quiet, config.ui.progress);
            commands::run(cli, ctx, &config, &provider).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let secret = provider
                .rollbar_token()
                .map(|token| token.expose_secret().to_string())
                .unwrap_or_default();
            eprintln!("Error: {}", redact_str(&errors::format_error(&e), &secret));
            ExitCode::FAILURE
        }
    }
}
