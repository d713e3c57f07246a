// SPDX-License-Identifier: Apache-2.0

//! Shared table and width helpers for human output.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use rbtriage_core::redact_str;
use rbtriage_core::utils::{fallback, truncate};

use crate::cli::OutputContext;

/// Row width used when stdout is not a terminal or is too narrow.
pub const FALLBACK_WIDTH: usize = 120;
/// Narrowest terminal that is rendered to its actual width.
pub const MIN_WIDTH: usize = 80;
/// Widest row ever rendered.
pub const MAX_WIDTH: usize = 140;

const LIST_NON_TITLE_WIDTH: usize = 74;
const MIN_TITLE_WIDTH: usize = 24;
const MAX_TITLE_WIDTH: usize = 120;

const DETAIL_NON_VALUE_WIDTH: usize = 20;
const MIN_VALUE_WIDTH: usize = 40;
const MAX_VALUE_WIDTH: usize = 100;

/// Maps a terminal column count to the row width used for tables.
pub fn clamp_width(columns: Option<usize>) -> usize {
    match columns {
        Some(cols) if cols >= MIN_WIDTH => (cols - 2).min(MAX_WIDTH),
        _ => FALLBACK_WIDTH,
    }
}

/// Row width for the current stdout.
pub fn render_width(ctx: &OutputContext) -> usize {
    if !ctx.is_tty {
        return FALLBACK_WIDTH;
    }
    let columns = console::Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| usize::from(cols));
    clamp_width(columns)
}

/// Width of the TITLE column in issue lists.
pub fn title_width(row_width: usize) -> usize {
    row_width
        .saturating_sub(LIST_NON_TITLE_WIDTH)
        .clamp(MIN_TITLE_WIDTH, MAX_TITLE_WIDTH)
}

/// Width of the value column in issue detail.
pub fn value_width(row_width: usize) -> usize {
    row_width
        .saturating_sub(DETAIL_NON_VALUE_WIDTH)
        .clamp(MIN_VALUE_WIDTH, MAX_VALUE_WIDTH)
}

/// Creates a table with the house style, bounded to `width` columns.
///
/// Cell colors are dropped when stdout is not a terminal.
pub fn new_table(width: usize, ctx: &OutputContext) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(u16::try_from(width).unwrap_or(u16::MAX));
    if !ctx.is_tty {
        table.force_no_tty();
    }
    table
}

/// Cell text: redacted, defaulted when blank, then cut to `max_len`.
pub fn cell_text(value: &str, secret: &str, max_len: usize) -> String {
    truncate(fallback(&redact_str(value, secret)), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_width() {
        assert_eq!(clamp_width(None), 120);
        assert_eq!(clamp_width(Some(60)), 120);
        assert_eq!(clamp_width(Some(100)), 98);
        assert_eq!(clamp_width(Some(300)), 140);
    }

    #[test]
    fn test_cell_text_redacts_before_truncating() {
        let text = cell_text("boom tok-0123456789abcdef", "tok-0123456789abcdef", 16);
        assert!(!text.contains("tok-"));
        assert!(text.starts_with("boom [REDACTED"));
        assert_eq!(cell_text("  ", "", 10), "unknown");
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(title_width(120), 46);
        assert_eq!(title_width(80), 24);
        assert_eq!(value_width(120), 100);
        assert_eq!(value_width(50), 40);
    }
}
