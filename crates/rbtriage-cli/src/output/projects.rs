// SPDX-License-Identifier: Apache-2.0

//! Project list and project change rendering. Tokens never reach output.

use std::io::{self, Write};

use super::Renderable;
use crate::cli::OutputContext;
use crate::commands::types::{ProjectAction, ProjectChangeResult, ProjectListResult};

impl Renderable for ProjectListResult {
    fn render_text(
        &self,
        w: &mut dyn Write,
        _ctx: &OutputContext,
        _secret: &str,
    ) -> io::Result<()> {
        if self.projects.is_empty() {
            return writeln!(w, "no configured projects");
        }
        for project in &self.projects {
            let marker = if project.active { "*" } else { " " };
            writeln!(w, "{marker} {}", project.name)?;
        }
        Ok(())
    }
}

impl Renderable for ProjectChangeResult {
    fn render_text(
        &self,
        w: &mut dyn Write,
        _ctx: &OutputContext,
        _secret: &str,
    ) -> io::Result<()> {
        match self.action {
            ProjectAction::Added => writeln!(w, "added project {}", self.project),
            ProjectAction::Activated => writeln!(w, "active project: {}", self.project),
            ProjectAction::Cycled => writeln!(w, "{}", self.project),
            ProjectAction::Removed => writeln!(w, "removed project {}", self.project),
            ProjectAction::RemovedAll => writeln!(w, "removed all projects"),
        }
    }
}
