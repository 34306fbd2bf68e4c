//! Application context for CLI command execution.
//!
//! [`App`] locates the workspace, loads its configuration and opens the
//! configured storage backend.
//!
//! # Example
//!
//! ```no_run
//! use flowdeck::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let projects = app.storage().list_projects(None).await?;
//!     println!("{} projects", projects.len());
//!     Ok(())
//! }
//! ```

use crate::commands::init::{
    CONFIG_FILE_NAME, FLOWDECK_DIR_NAME, WorkspaceConfig, find_workspace_root,
};
use crate::domain::{CycleId, EntityKind, IssueId, LabelId, ProjectId, resolve_prefix};
use crate::error::{ConfigError, Error, Result, ValidationError};
use crate::storage::{TrackerStorage, create_storage};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application context for CLI operations.
pub struct App {
    /// The storage backend (trait object for polymorphism)
    storage: Box<dyn TrackerStorage>,

    /// Path to the `.flowdeck` directory
    flowdeck_dir: PathBuf,

    /// Loaded workspace configuration
    config: WorkspaceConfig,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("flowdeck_dir", &self.flowdeck_dir)
            .field("config", &self.config)
            .field("storage", &"<dyn TrackerStorage>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree for `.flowdeck/`, loads the
    /// configuration and opens storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No workspace is found in the directory tree
    /// - Configuration cannot be loaded
    /// - Storage initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_workspace_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let flowdeck_dir = root_dir.join(FLOWDECK_DIR_NAME);
        let config = WorkspaceConfig::load(&flowdeck_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        let storage = create_storage(backend, config.storage_options()).await?;

        Ok(Self {
            storage,
            flowdeck_dir,
            config,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn TrackerStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    #[must_use]
    pub fn storage(&self) -> &dyn TrackerStorage {
        self.storage.as_ref()
    }

    /// Get the workspace configuration.
    #[must_use]
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Get the path to the `.flowdeck` directory.
    #[must_use]
    pub fn flowdeck_dir(&self) -> &Path {
        &self.flowdeck_dir
    }

    /// Persist the storage state.
    ///
    /// Call after every mutating operation. When the write fails the
    /// in-memory state is reloaded from disk so it matches what was last
    /// persisted, and the write error is returned.
    ///
    /// # Errors
    ///
    /// The save error; a reload failure is logged.
    pub async fn commit(&mut self) -> Result<()> {
        match self.storage.save().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save workspace, reloading last saved state");
                if let Err(reload_err) = self.storage.reload().await {
                    tracing::error!(error = %reload_err, "Failed to reload workspace");
                }
                Err(e)
            }
        }
    }

    /// Resolve a project from a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// `NotFound`, or a `Validation` error for short or ambiguous prefixes.
    pub async fn resolve_project(&self, input: &str) -> Result<ProjectId> {
        let data = self.storage.export_all().await?;
        resolve(EntityKind::Project, input, data.projects.iter().map(|p| p.id))
    }

    /// Resolve an issue from a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// `NotFound`, or a `Validation` error for short or ambiguous prefixes.
    pub async fn resolve_issue(&self, input: &str) -> Result<IssueId> {
        let data = self.storage.export_all().await?;
        resolve(EntityKind::Issue, input, data.issues.iter().map(|i| i.id))
    }

    /// Resolve a cycle from a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// `NotFound`, or a `Validation` error for short or ambiguous prefixes.
    pub async fn resolve_cycle(&self, input: &str) -> Result<CycleId> {
        let data = self.storage.export_all().await?;
        resolve(EntityKind::Cycle, input, data.cycles.iter().map(|c| c.id))
    }

    /// Resolve a label by id, id prefix or case-insensitive name.
    ///
    /// Name lookups only consider global labels and labels of `project`.
    ///
    /// # Errors
    ///
    /// `NotFound`, or a `Validation` error for ambiguous input.
    pub async fn resolve_label(&self, input: &str, project: Option<&ProjectId>) -> Result<LabelId> {
        let data = self.storage.export_all().await?;
        let named: Vec<LabelId> = data
            .labels
            .iter()
            .filter(|l| l.project.is_none() || l.project.as_ref() == project)
            .filter(|l| l.name.eq_ignore_ascii_case(input.trim()))
            .map(|l| l.id)
            .collect();
        match named.as_slice() {
            [id] => Ok(*id),
            [] => resolve(EntityKind::Label, input, data.labels.iter().map(|l| l.id)),
            _ => Err(ValidationError::AmbiguousId {
                kind: EntityKind::Label,
                prefix: input.to_string(),
                count: named.len(),
            }
            .into()),
        }
    }
}

fn resolve<T, I>(kind: EntityKind, input: &str, ids: I) -> Result<T>
where
    T: FromStr + Display + Copy,
    I: IntoIterator<Item = T>,
{
    if let Ok(id) = input.trim().parse::<T>() {
        return Ok(id);
    }
    resolve_prefix(kind, input, ids)?.ok_or_else(|| Error::not_found(kind, input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use crate::domain::NewProject;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.flowdeck_dir().ends_with(".flowdeck"));
        assert!(app.config().defaults.seed_labels);
    }

    #[tokio::test]
    async fn test_app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();

        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        assert_eq!(app.flowdeck_dir(), temp_dir.path().join(".flowdeck"));
    }

    #[tokio::test]
    async fn test_app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let err = App::from_directory(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_commit_persists_between_instances() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();

        let mut app = App::from_directory(temp_dir.path()).await.unwrap();
        let project = app
            .storage_mut()
            .create_project(NewProject::named("Persisted"))
            .await
            .unwrap();
        app.commit().await.unwrap();

        let reopened = App::from_directory(temp_dir.path()).await.unwrap();
        let loaded = reopened.storage().get_project(&project.id).await.unwrap();
        assert_eq!(loaded, Some(project));
    }

    #[tokio::test]
    async fn test_resolve_by_prefix_and_label_name() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();

        let mut app = App::from_directory(temp_dir.path()).await.unwrap();
        let project = app
            .storage_mut()
            .create_project(NewProject::named("Lookup"))
            .await
            .unwrap();

        let prefix = &project.id.to_string()[..8];
        assert_eq!(app.resolve_project(prefix).await.unwrap(), project.id);

        let bug = app.resolve_label("bug", Some(&project.id)).await.unwrap();
        let labels = app.storage().list_labels(Some(&project.id)).await.unwrap();
        assert!(labels.iter().any(|l| l.id == bug && l.name == "Bug"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_prefix() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path()).await.unwrap();
        let app = App::from_directory(temp_dir.path()).await.unwrap();

        let err = app.resolve_issue("abcd").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: EntityKind::Issue, .. }));

        let err = app.resolve_issue("ab").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::IdPrefixTooShort(_))
        ));
    }
}
