// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the rbtriage CLI.

pub mod actions;
pub mod issues;
pub mod project;
pub mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rbtriage_core::{AppConfig, ItemCounter, RollbarClient, TokenProvider, TriageService};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::cli::{Cli, Commands, OutputContext};
use crate::output;
use crate::provider::CliTokenProvider;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Runs `operation` behind a spinner, clearing it whether or not it succeeds.
async fn with_spinner<T>(
    ctx: &OutputContext,
    message: &str,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    let spinner = maybe_spinner(ctx, message);
    let result = operation.await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    result
}

/// Resolves the token and builds the triage service over the Rollbar client.
fn connect(
    provider: &CliTokenProvider,
    config: &AppConfig,
) -> Result<(TriageService<RollbarClient>, SecretString)> {
    let token = provider.rollbar_token()?;
    let client = RollbarClient::new(token.clone(), &config.api)
        .context("Failed to create Rollbar client")?;
    debug!(base_url = %config.api.base_url, "Rollbar client ready");
    let service = TriageService::new(client, Duration::from_secs(config.api.timeout_seconds));
    Ok((service, token))
}

fn parse_counter(counter: &str) -> Result<ItemCounter> {
    Ok(counter.trim().parse::<ItemCounter>()?)
}

/// Dispatch to the appropriate command handler.
///
/// Runs `recent` when no subcommand is given.
pub async fn run(
    cli: Cli,
    ctx: OutputContext,
    config: &AppConfig,
    provider: &CliTokenProvider,
) -> Result<()> {
    let limit = cli.limit.unwrap_or(config.output.default_limit);
    let command = cli.command.unwrap_or(Commands::Recent);

    match command {
        Commands::Active => {
            let filters = cli.filters.to_filters()?;
            let (service, token) = connect(provider, config)?;
            let result = with_spinner(&ctx, "Fetching active issues...", async {
                issues::active(&service, limit, &filters).await
            })
            .await?;
            output::render(&result, &ctx, token.expose_secret())
        }

        Commands::Recent => {
            let filters = cli.filters.to_filters()?;
            let (service, token) = connect(provider, config)?;
            let result = with_spinner(&ctx, "Fetching recent issues...", async {
                issues::recent(&service, limit, &filters).await
            })
            .await?;
            output::render(&result, &ctx, token.expose_secret())
        }

        Commands::Show { counter } => {
            let counter = parse_counter(&counter)?;
            let (service, token) = connect(provider, config)?;
            let detail = with_spinner(&ctx, "Fetching issue...", async {
                issues::show(&service, counter).await
            })
            .await?;
            output::render(&detail, &ctx, token.expose_secret())
        }

        Commands::Resolve {
            counter,
            resolved_in_version,
        } => {
            let counter = parse_counter(&counter)?;
            let (service, token) = connect(provider, config)?;
            let result = with_spinner(&ctx, "Resolving issue...", async {
                actions::resolve(&service, counter, resolved_in_version.as_deref()).await
            })
            .await?;
            output::render(&result, &ctx, token.expose_secret())
        }

        Commands::Reopen { counter } => {
            let counter = parse_counter(&counter)?;
            let (service, token) = connect(provider, config)?;
            let result = with_spinner(&ctx, "Reopening issue...", async {
                actions::reopen(&service, counter).await
            })
            .await?;
            output::render(&result, &ctx, token.expose_secret())
        }

        Commands::Mute { counter, duration } => {
            let counter = parse_counter(&counter)?;
            let (service, token) = connect(provider, config)?;
            let result = with_spinner(&ctx, "Muting issue...", async {
                actions::mute(&service, counter, duration).await
            })
            .await?;
            output::render(&result, &ctx, token.expose_secret())
        }

        Commands::Project(project_cmd) => {
            project::run(project_cmd, cli.token.as_deref(), &ctx)
        }
    }
}
