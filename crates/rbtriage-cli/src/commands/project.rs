// SPDX-License-Identifier: Apache-2.0

//! Project store commands.

use anyhow::{Context, Result, bail};
use rbtriage_core::{ProjectStore, TriageError};

use super::types::{ProjectAction, ProjectChangeResult, ProjectEntry, ProjectListResult};
use crate::cli::{OutputContext, ProjectCommand};
use crate::output;

/// Runs a project subcommand against the default store.
///
/// `token` is the global `--token` value, used by `project add`.
pub fn run(command: ProjectCommand, token: Option<&str>, ctx: &OutputContext) -> Result<()> {
    let store = ProjectStore::open()?;
    let secret = token.unwrap_or_default();
    match command {
        ProjectCommand::List => output::render(&list(&store)?, ctx, secret),
        command => output::render(&change(&store, command, token)?, ctx, secret),
    }
}

/// Lists configured projects without their tokens.
pub fn list(store: &ProjectStore) -> Result<ProjectListResult> {
    let file = store.load().context("list projects")?;
    let projects = file
        .projects
        .iter()
        .map(|project| ProjectEntry {
            name: project.name.clone(),
            active: project.name == file.active_project,
        })
        .collect();
    Ok(ProjectListResult {
        active_project: file.active_project,
        projects,
    })
}

/// Applies a mutating project subcommand.
pub fn change(
    store: &ProjectStore,
    command: ProjectCommand,
    token: Option<&str>,
) -> Result<ProjectChangeResult> {
    let (action, project) = match command {
        ProjectCommand::Add { name } => {
            let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
                return Err(TriageError::Validation(
                    "project token is required: pass it with --token".to_string(),
                ))
                .context("add project");
            };
            store.add_project(&name, token).context("add project")?;
            (ProjectAction::Added, name.trim().to_string())
        }
        ProjectCommand::Use { name } => {
            store.use_project(&name).context("use project")?;
            (ProjectAction::Activated, name.trim().to_string())
        }
        ProjectCommand::Next => (
            ProjectAction::Cycled,
            store.cycle_project().context("next project")?,
        ),
        ProjectCommand::Remove { all: true, .. } => {
            store.remove_all_projects().context("remove projects")?;
            (ProjectAction::RemovedAll, String::new())
        }
        ProjectCommand::Remove { name, .. } => {
            let name = name.unwrap_or_default();
            store.remove_project(&name).context("remove project")?;
            (ProjectAction::Removed, name.trim().to_string())
        }
        ProjectCommand::List => bail!("project list does not change the store"),
    };
    Ok(ProjectChangeResult { action, project })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ProjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::at_path(dir.path().join("projects.json"));
        (dir, store)
    }

    fn add(store: &ProjectStore, name: &str, token: &str) {
        change(
            store,
            ProjectCommand::Add {
                name: name.to_string(),
            },
            Some(token),
        )
        .unwrap();
    }

    #[test]
    fn test_add_requires_token() {
        let (_dir, store) = temp_store();
        let err = change(
            &store,
            ProjectCommand::Add {
                name: "web".to_string(),
            },
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "add project");
        assert!(format!("{err:#}").contains("project token is required"));
    }

    #[test]
    fn test_list_marks_active_without_tokens() {
        let (_dir, store) = temp_store();
        add(&store, "web", "tok-web");
        add(&store, "api", "tok-api");

        let listing = list(&store).unwrap();
        assert_eq!(listing.active_project, "web");
        let names: Vec<_> = listing.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["api", "web"]);
        assert!(listing.projects[1].active);

        let json = serde_json::to_string(&listing).unwrap();
        assert!(!json.contains("tok-"));
    }

    #[test]
    fn test_next_and_remove() {
        let (_dir, store) = temp_store();
        add(&store, "web", "tok-web");
        add(&store, "api", "tok-api");

        let cycled = change(&store, ProjectCommand::Next, None).unwrap();
        assert_eq!(cycled.action, ProjectAction::Cycled);
        assert_eq!(cycled.project, "api");

        let removed = change(
            &store,
            ProjectCommand::Remove {
                name: Some("api".to_string()),
                all: false,
            },
            None,
        )
        .unwrap();
        assert_eq!(removed.action, ProjectAction::Removed);
        assert_eq!(list(&store).unwrap().active_project, "web");

        change(
            &store,
            ProjectCommand::Remove {
                name: None,
                all: true,
            },
            None,
        )
        .unwrap();
        assert!(list(&store).unwrap().projects.is_empty());
    }

    #[test]
    fn test_errors_carry_operation_prefix() {
        let (_dir, store) = temp_store();

        let err = change(
            &store,
            ProjectCommand::Remove {
                name: Some("ghost".to_string()),
                all: false,
            },
            None,
        )
        .unwrap_err();
        assert_eq!(format!("{err:#}"), "remove project: project \"ghost\" not found");

        let err = change(&store, ProjectCommand::Next, None).unwrap_err();
        assert_eq!(format!("{err:#}"), "next project: no configured projects");
    }

    #[test]
    fn test_use_unknown_project() {
        let (_dir, store) = temp_store();
        add(&store, "web", "tok-web");

        let err = change(
            &store,
            ProjectCommand::Use {
                name: "nope".to_string(),
            },
            None,
        )
        .unwrap_err();
        assert_eq!(format!("{err:#}"), "use project: project \"nope\" not found");
    }
}
