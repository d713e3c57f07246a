// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the rbtriage CLI.
//!
//! Uses `tracing` with `tracing-subscriber`, writing to stderr so stdout
//! stays clean for tables and JSON. The level can be controlled via the
//! `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Debug output for troubleshooting
//! RUST_LOG=rbtriage_core=debug rbtriage show 42
//!
//! # Same, via the flag
//! rbtriage show 42 --verbose
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default directives: warnings from rbtriage, errors from the HTTP stack.
const DEFAULT_FILTER: &str = "rbtriage=warn,rbtriage_core=warn,reqwest=error";

/// Directives used with `--verbose`.
const VERBOSE_FILTER: &str = "rbtriage=debug,rbtriage_core=debug,reqwest=warn";

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence over both defaults.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
