// SPDX-License-Identifier: Apache-2.0

//! Output rendering for CLI commands.
//!
//! Command handlers return data; this module handles presentation. Both
//! formats pass through the redaction filter before anything reaches stdout.
//! Human renderers also redact each value before it enters a table, since
//! wrapping can split a secret across lines.

use std::io::{self, Write};

use anyhow::{Context, Result};
use rbtriage_core::{redact_str, redact_value};
use serde::Serialize;

use crate::cli::{OutputContext, OutputFormat};

mod actions;
pub mod common;
mod issues;
mod projects;

/// Trait for types that can be rendered in multiple output formats.
pub trait Renderable: Serialize {
    /// Render as human-readable text to the given writer, masking `secret`
    /// in every value.
    fn render_text(
        &self,
        w: &mut dyn Write,
        ctx: &OutputContext,
        secret: &str,
    ) -> io::Result<()>;
}

/// Renders `result` to stdout, masking `secret` and credential-like fields.
pub fn render<T: Renderable>(result: &T, ctx: &OutputContext, secret: &str) -> Result<()> {
    render_to(&mut io::stdout().lock(), result, ctx, secret)
}

/// Renders `result` to `w`; JSON via serde, human text via [`Renderable`].
pub fn render_to<T: Renderable>(
    w: &mut dyn Write,
    result: &T,
    ctx: &OutputContext,
    secret: &str,
) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            let value = serde_json::to_value(result).context("Failed to serialize to JSON")?;
            let json = serde_json::to_string_pretty(&redact_value(&value, secret))
                .context("Failed to serialize to JSON")?;
            writeln!(w, "{json}").context("Failed to write output")?;
        }
        OutputFormat::Human => {
            let mut buffer = Vec::new();
            result
                .render_text(&mut buffer, ctx, secret)
                .context("Failed to render text")?;
            let text = String::from_utf8_lossy(&buffer);
            write!(w, "{}", redact_str(&text, secret)).context("Failed to write output")?;
        }
    }
    Ok(())
}
