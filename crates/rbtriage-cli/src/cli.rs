// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for rbtriage.
//!
//! Uses clap's derive API. Listing and filter flags are global so they can
//! be given before or after the subcommand; `recent` runs when no subcommand
//! is given.

use std::io::IsTerminal;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rbtriage_core::{IssueFilters, Result};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Global output configuration passed to commands.
#[derive(Debug, Clone)]
pub struct OutputContext {
    /// Output format (human, json)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners)
    pub quiet: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
    /// Progress spinners enabled in configuration
    pub progress: bool,
    /// Running under CI
    pub ci: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments and UI settings.
    pub fn from_cli(format: OutputFormat, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            quiet,
            is_tty: std::io::stdout().is_terminal(),
            progress,
            ci: std::env::var_os("CI").is_some_and(|v| !v.is_empty()),
        }
    }

    /// Returns true if interactive elements (spinners) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty
            && !self.quiet
            && self.progress
            && !self.ci
            && matches!(self.format, OutputFormat::Human)
    }
}

/// Issue filter flags shared by the listing commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Filter by environment
    #[arg(long = "env", global = true, value_name = "ENV")]
    pub environment: Option<String>,

    /// Filter by status
    #[arg(long, global = true)]
    pub status: Option<String>,

    /// Filter by last seen time (RFC 3339 or unix seconds)
    #[arg(long, global = true, value_name = "TIME")]
    pub since: Option<String>,

    /// Filter by last seen time (RFC 3339 or unix seconds)
    #[arg(long, global = true, value_name = "TIME")]
    pub until: Option<String>,

    /// Filter by minimum occurrence count
    #[arg(long, global = true, value_name = "COUNT")]
    pub min_occurrences: Option<String>,

    /// Filter by maximum occurrence count
    #[arg(long, global = true, value_name = "COUNT")]
    pub max_occurrences: Option<String>,
}

impl FilterArgs {
    /// Parses and validates the flags into [`IssueFilters`].
    pub fn to_filters(&self) -> Result<IssueFilters> {
        IssueFilters::parse(
            self.environment.as_deref().unwrap_or_default(),
            self.status.as_deref().unwrap_or_default(),
            self.since.as_deref(),
            self.until.as_deref(),
            self.min_occurrences.as_deref(),
            self.max_occurrences.as_deref(),
        )
    }
}

/// rbtriage - triage Rollbar issues from the terminal.
///
/// Lists active and recently seen issues, shows the main error of an issue
/// and resolves, reopens or mutes it.
#[derive(Debug, Parser)]
#[command(name = "rbtriage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    pub format: OutputFormat,

    /// Configured project name
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Rollbar project access token (overrides configured project token)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Maximum number of issues to show (0 or less for no limit)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Suppress non-essential output (spinners)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug-level logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `recent`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List active issues
    Active,

    /// List most recently seen active issues
    Recent,

    /// Show details for one item counter
    Show {
        /// Item counter
        counter: String,
    },

    /// Mark an issue resolved
    Resolve {
        /// Item counter
        counter: String,

        /// Version the issue was resolved in (max 40 characters)
        #[arg(long, value_name = "VERSION")]
        resolved_in_version: Option<String>,
    },

    /// Reopen an issue
    Reopen {
        /// Item counter
        counter: String,
    },

    /// Mute an issue
    Mute {
        /// Item counter
        counter: String,

        /// Mute duration in seconds
        #[arg(long, value_name = "SECONDS")]
        duration: Option<u64>,
    },

    /// Manage configured Rollbar projects
    #[command(subcommand)]
    Project(ProjectCommand),
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Add or update a project token (pass the token with --token)
    Add {
        /// Project name
        name: String,
    },

    /// List configured projects
    List,

    /// Set the active project
    Use {
        /// Project name
        name: String,
    },

    /// Cycle to the next project
    Next,

    /// Remove a configured project
    Remove {
        /// Project name
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        name: Option<String>,

        /// Remove all configured projects and tokens
        #[arg(long)]
        all: bool,
    },
}
