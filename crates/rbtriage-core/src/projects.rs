// SPDX-License-Identifier: Apache-2.0

//! Local project token store.
//!
//! Stores named Rollbar project access tokens in
//! `<config dir>/rbtriage/projects.json` together with the active project.
//! The file is rewritten on every change without locking; the last writer
//! wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::projects_file_path;
use crate::error::TriageError;

/// A named project and its access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name, unique within the store.
    #[serde(default)]
    pub name: String,
    /// Project access token.
    #[serde(default)]
    pub token: String,
}

/// On-disk content of the project store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsFile {
    /// Name of the project used when none is given explicitly.
    #[serde(default)]
    pub active_project: String,
    /// Known projects, sorted by name.
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ProjectsFile {
    /// Trims names and tokens, drops unnamed entries and sorts by name.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut projects: Vec<Project> = self
            .projects
            .into_iter()
            .filter_map(|project| {
                let name = project.name.trim();
                (!name.is_empty()).then(|| Project {
                    name: name.to_string(),
                    token: project.token.trim().to_string(),
                })
            })
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            active_project: self.active_project.trim().to_string(),
            projects,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|project| project.name == name)
    }
}

/// Handle to the project store file.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    /// Opens the store at the default location.
    pub fn open() -> Result<Self> {
        Ok(Self::at_path(projects_file_path()?))
    }

    /// Opens the store backed by `path`.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the store. A missing file is an empty store.
    pub fn load(&self) -> Result<ProjectsFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ProjectsFile::default()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read project store: {}", self.path.display())
                });
            }
        };

        let file: ProjectsFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse project store: {}", self.path.display()))?;

        Ok(file.normalized())
    }

    /// Normalizes and writes the store, owner-readable only.
    pub fn save(&self, file: ProjectsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            restrict_permissions(parent, 0o700)?;
        }

        let mut contents = serde_json::to_string_pretty(&file.normalized())
            .context("Failed to serialize project store")?;
        contents.push('\n');

        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write project store: {}", self.path.display()))?;
        restrict_permissions(&self.path, 0o600)?;

        debug!(path = %self.path.display(), "Saved project store");
        Ok(())
    }

    /// Adds a project or replaces the token of an existing one.
    ///
    /// The project becomes active when no project is active yet.
    pub fn add_project(&self, name: &str, token: &str) -> Result<()> {
        let name = name.trim();
        let token = token.trim();
        if name.is_empty() {
            return Err(TriageError::Validation("project name is required".to_string()).into());
        }
        if token.is_empty() {
            return Err(TriageError::Validation("project token is required".to_string()).into());
        }

        let mut file = self.load()?;
        match file.position(name) {
            Some(index) => file.projects[index].token = token.to_string(),
            None => file.projects.push(Project {
                name: name.to_string(),
                token: token.to_string(),
            }),
        }
        if file.active_project.is_empty() {
            file.active_project = name.to_string();
        }

        self.save(file)
    }

    /// Removes a project; removing the active one activates the first remaining.
    pub fn remove_project(&self, name: &str) -> Result<()> {
        let name = name.trim();
        let mut file = self.load()?;
        let Some(index) = file.position(name) else {
            return Err(TriageError::ProjectNotFound {
                name: name.to_string(),
            }
            .into());
        };

        file.projects.remove(index);
        if file.active_project == name {
            file.active_project = file
                .projects
                .first()
                .map(|project| project.name.clone())
                .unwrap_or_default();
        }

        self.save(file)
    }

    /// Removes every project and clears the active selection.
    pub fn remove_all_projects(&self) -> Result<()> {
        self.save(ProjectsFile::default())
    }

    /// Makes `name` the active project.
    pub fn use_project(&self, name: &str) -> Result<()> {
        let name = name.trim();
        let mut file = self.load()?;
        if file.position(name).is_none() {
            return Err(TriageError::ProjectNotFound {
                name: name.to_string(),
            }
            .into());
        }

        file.active_project = name.to_string();
        self.save(file)
    }

    /// Activates the next project alphabetically, wrapping around.
    ///
    /// Starts at the first project when none is active. Returns the new
    /// active project name.
    pub fn cycle_project(&self) -> Result<String> {
        let mut file = self.load()?;
        if file.projects.is_empty() {
            return Err(TriageError::NoProjects.into());
        }

        let next = file
            .position(&file.active_project)
            .map_or(0, |index| (index + 1) % file.projects.len());
        let name = file.projects[next].name.clone();
        file.active_project.clone_from(&name);

        self.save(file)?;
        Ok(name)
    }

    /// Looks up the token for `project`, or for the active project when `None`.
    ///
    /// Returns the token and the name of the project it belongs to.
    pub fn resolve_token(&self, project: Option<&str>) -> Result<(SecretString, String)> {
        let file = self.load()?;
        if file.projects.is_empty() {
            return Err(TriageError::NoProjects.into());
        }

        let target = project
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(file.active_project.as_str());
        if target.is_empty() {
            return Err(TriageError::Config {
                message: "no active project configured".to_string(),
            }
            .into());
        }

        let Some(index) = file.position(target) else {
            return Err(TriageError::ProjectNotFound {
                name: target.to_string(),
            }
            .into());
        };
        let token = &file.projects[index].token;
        if token.is_empty() {
            return Err(TriageError::Config {
                message: format!("project \"{target}\" has no token"),
            }
            .into());
        }

        Ok((SecretString::from(token.clone()), target.to_string()))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
