// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers and rendered by `output`.

use rbtriage_core::IssueSummary;
use serde::Serialize;

/// Result of `active` and `recent`.
#[derive(Debug, Serialize)]
pub struct IssueListResult {
    /// Listed issues, in display order.
    pub issues: Vec<IssueSummary>,
}

/// One entry of `project list`. Tokens are never included.
#[derive(Debug, Serialize)]
pub struct ProjectEntry {
    /// Project name.
    pub name: String,
    /// Whether this is the active project.
    pub active: bool,
}

/// Result of `project list`.
#[derive(Debug, Serialize)]
pub struct ProjectListResult {
    /// Active project name, empty when none.
    pub active_project: String,
    /// Configured projects, sorted by name.
    pub projects: Vec<ProjectEntry>,
}

/// What a project subcommand changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    /// `project add`
    Added,
    /// `project use`
    Activated,
    /// `project next`
    Cycled,
    /// `project remove <name>`
    Removed,
    /// `project remove --all`
    RemovedAll,
}

/// Result of a mutating project subcommand.
#[derive(Debug, Serialize)]
pub struct ProjectChangeResult {
    /// The change made.
    pub action: ProjectAction,
    /// Project affected; empty for `remove --all`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project: String,
}
