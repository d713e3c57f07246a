// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};

use rbtriage_core::ItemActionResult;

use super::Renderable;
use super::common::{cell_text, render_width, title_width};
use crate::cli::OutputContext;

impl Renderable for ItemActionResult {
    fn render_text(
        &self,
        w: &mut dyn Write,
        ctx: &OutputContext,
        secret: &str,
    ) -> io::Result<()> {
        let issue = &self.issue;
        let width = title_width(render_width(ctx));
        let title = cell_text(&issue.title, secret, width);
        writeln!(w, "{} issue #{}: {title}", self.action, issue.counter)?;
        writeln!(w, "status: {}", cell_text(&issue.status, secret, width))
    }
}

#[cfg(test)]
mod tests {
    use rbtriage_core::{IssueSummary, ItemCounter, ItemId};
    use serde_json::{Value, json};

    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::test_support::render_string;

    fn resolved() -> ItemActionResult {
        ItemActionResult {
            action: "resolved".to_string(),
            issue: IssueSummary {
                item_id: ItemId(900),
                counter: ItemCounter(12),
                title: "NullPointerException".to_string(),
                status: "resolved".to_string(),
                environment: String::new(),
                last_occurrence_timestamp: None,
                occurrences: None,
                raw: Value::Null,
            },
        }
    }

    #[test]
    fn test_render_action_text() {
        let out = render_string(&resolved(), OutputFormat::Human, "");
        assert_eq!(
            out,
            "resolved issue #12: NullPointerException\nstatus: resolved\n"
        );
    }

    #[test]
    fn test_render_action_json() {
        let out = render_string(&resolved(), OutputFormat::Json, "");
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["action"], json!("resolved"));
        assert_eq!(value["issue"]["counter"], json!(12));
        assert!(value["issue"].get("raw").is_none());
    }
}
