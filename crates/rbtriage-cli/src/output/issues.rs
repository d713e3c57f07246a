// SPDX-License-Identifier: Apache-2.0

//! Issue list and issue detail rendering.

use std::io::{self, Write};

use comfy_table::{Cell, Color};
use console::style;
use rbtriage_core::IssueDetail;
use rbtriage_core::summary::UNKNOWN;
use rbtriage_core::utils::{format_count, format_timestamp};

use super::Renderable;
use super::common::{cell_text, new_table, render_width, title_width, value_width};
use crate::cli::OutputContext;
use crate::commands::types::IssueListResult;

fn status_color(status: &str) -> Color {
    match status.trim().to_lowercase().as_str() {
        "active" => Color::Red,
        "resolved" => Color::Green,
        "muted" => Color::DarkGrey,
        _ => Color::Reset,
    }
}

impl Renderable for IssueListResult {
    fn render_text(
        &self,
        w: &mut dyn Write,
        ctx: &OutputContext,
        secret: &str,
    ) -> io::Result<()> {
        if self.issues.is_empty() {
            return writeln!(w, "no issues found");
        }

        let width = render_width(ctx);
        let max_title = title_width(width);

        let mut table = new_table(width, ctx);
        table.set_header(vec![
            "COUNTER",
            "STATUS",
            "ENV",
            "OCCURRENCES",
            "LAST_SEEN",
            "TITLE",
        ]);
        for issue in &self.issues {
            let status = cell_text(&issue.status, secret, max_title);
            table.add_row(vec![
                Cell::new(issue.counter).fg(Color::Cyan),
                Cell::new(&status).fg(status_color(&status)),
                Cell::new(cell_text(&issue.environment, secret, max_title)),
                Cell::new(format_count(issue.occurrences)),
                Cell::new(format_timestamp(issue.last_occurrence_timestamp)),
                Cell::new(cell_text(&issue.title, secret, max_title)),
            ]);
        }

        writeln!(w, "{table}")
    }
}

/// Whether the main error adds anything over the title.
fn shows_main_error(detail: &IssueDetail) -> bool {
    let main = detail.main_error.trim();
    if main.is_empty() || main.eq_ignore_ascii_case(UNKNOWN) {
        return false;
    }
    let title = detail.issue.title.trim();
    title.is_empty() || !title.to_lowercase().contains(&main.to_lowercase())
}

impl Renderable for IssueDetail {
    fn render_text(
        &self,
        w: &mut dyn Write,
        ctx: &OutputContext,
        secret: &str,
    ) -> io::Result<()> {
        let width = render_width(ctx);
        let max_value = value_width(width);

        if shows_main_error(self) {
            let heading = style("Main Error:").bold().force_styling(ctx.is_tty);
            writeln!(
                w,
                "{heading} {}",
                cell_text(&self.main_error, secret, max_value)
            )?;
            writeln!(w)?;
        }

        let issue = &self.issue;
        let mut table = new_table(width, ctx);
        let rows = [
            ("Title", issue.title.clone()),
            ("Status", issue.status.clone()),
            ("Environment", issue.environment.clone()),
            ("Occurrences", format_count(issue.occurrences)),
            ("Counter", issue.counter.to_string()),
            ("Item ID", issue.item_id.to_string()),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label).fg(Color::DarkGrey),
                Cell::new(cell_text(&value, secret, max_value)),
            ]);
        }

        writeln!(w, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use rbtriage_core::{IssueSummary, ItemCounter, ItemId};
    use serde_json::{Value, json};

    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::test_support::{ctx, render_string};

    fn summary(counter: u64, title: &str) -> IssueSummary {
        IssueSummary {
            item_id: ItemId(counter * 100),
            counter: ItemCounter(counter),
            title: title.to_string(),
            status: "active".to_string(),
            environment: "production".to_string(),
            last_occurrence_timestamp: Some(1_700_000_000),
            occurrences: Some(12),
            raw: json!({"id": counter * 100, "access_token": "secret-123"}),
        }
    }

    fn detail(title: &str, main_error: &str) -> IssueDetail {
        IssueDetail {
            issue: summary(7, title),
            main_error: main_error.to_string(),
            item_raw: json!({"title": title}),
            instance: None,
            instance_raw: Value::Null,
        }
    }

    #[test]
    fn test_empty_list() {
        let out = render_string(&IssueListResult { issues: vec![] }, OutputFormat::Human, "");
        assert_eq!(out, "no issues found\n");
    }

    #[test]
    fn test_list_table_columns() {
        let result = IssueListResult {
            issues: vec![summary(42, "TypeError in checkout")],
        };
        let out = render_string(&result, OutputFormat::Human, "");

        for column in ["COUNTER", "STATUS", "ENV", "OCCURRENCES", "LAST_SEEN", "TITLE"] {
            assert!(out.contains(column), "missing column {column}");
        }
        assert!(out.contains("2023-11-14T22:13:20Z"));
        assert!(out.contains("TypeError in checkout"));
    }

    #[test]
    fn test_list_json_is_redacted() {
        let result = IssueListResult {
            issues: vec![summary(42, "leaks secret-123")],
        };
        let out = render_string(&result, OutputFormat::Json, "secret-123");
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["issues"][0]["counter"], json!(42));
        assert_eq!(value["issues"][0]["title"], json!("leaks [REDACTED]"));
        assert_eq!(value["issues"][0]["raw"]["access_token"], json!("[REDACTED]"));
        assert!(!out.contains("secret-123"));
    }

    #[test]
    fn test_detail_shows_informative_main_error() {
        let out = render_string(
            &detail("Checkout failed", "connection reset by peer"),
            OutputFormat::Human,
            "",
        );
        assert!(out.starts_with("Main Error: connection reset by peer\n\n"));
        assert!(out.contains("Item ID"));
        assert!(out.contains("700"));
    }

    #[test]
    fn test_detail_hides_main_error_contained_in_title() {
        let out = render_string(
            &detail("TimeoutError: db timeout", "DB TIMEOUT"),
            OutputFormat::Human,
            "",
        );
        assert!(!out.contains("Main Error:"));

        let out = render_string(&detail("Checkout", "unknown"), OutputFormat::Human, "");
        assert!(!out.contains("Main Error:"));
    }

    #[test]
    fn test_cells_are_redacted_before_layout() {
        let secret = "tok-0123456789abcdef0123456789abcdef";
        let result = IssueListResult {
            issues: vec![summary(42, &format!("request with {secret} failed"))],
        };
        let mut out = Vec::new();
        result
            .render_text(&mut out, &ctx(OutputFormat::Human), secret)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("tok-"));
        assert!(out.contains("request with [REDACTED] failed"));

        let mut out = Vec::new();
        detail(&format!("auth {secret}"), &format!("rejected {secret}"))
            .render_text(&mut out, &ctx(OutputFormat::Human), secret)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("tok-"));
        assert!(out.starts_with("Main Error: rejected [REDACTED]"));
    }

    #[test]
    fn test_detail_json_shape() {
        let out = render_string(&detail("Checkout", "boom"), OutputFormat::Json, "");
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["main_error"], json!("boom"));
        assert_eq!(value["issue"]["item_id"], json!(700));
        assert_eq!(value["item_raw"], json!({"title": "Checkout"}));
        assert!(value.get("instance").is_none());
    }
}
