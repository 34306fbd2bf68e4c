//! Implementation of the `init` command and the workspace configuration.
//!
//! A workspace is a directory containing `.flowdeck/` with a YAML config
//! file and the JSONL store.

use crate::domain::DEFAULT_CYCLE_CAPACITY;
use crate::error::{ConfigError, Result};
use crate::storage::{StorageBackend, StorageOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the workspace directory
pub const FLOWDECK_DIR_NAME: &str = ".flowdeck";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the store file
pub const STORE_FILE_NAME: &str = "store.jsonl";

/// Name of the gitignore file within `.flowdeck`
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum directory depth to traverse when searching for the workspace root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Defaults applied when creating entities
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type: `jsonl` or `memory`
    pub backend: String,

    /// Path to the data file, relative to the workspace root
    pub data_file: String,
}

/// Creation defaults section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Seed Feature/Bug/Tech Debt/Research/AI Generated labels into new projects
    pub seed_labels: bool,

    /// Capacity in hours for cycles created without one
    pub cycle_capacity: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            seed_labels: true,
            cycle_capacity: DEFAULT_CYCLE_CAPACITY,
        }
    }
}

impl StorageConfig {
    /// Resolve the configured backend against the workspace root.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownBackend` for anything but `jsonl` or `memory`.
    pub fn to_backend(&self, root: &Path) -> Result<StorageBackend> {
        match self.backend.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

impl WorkspaceConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// `ConfigError` if the file cannot be read, parsed or fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(ConfigError::Io)?;
        let config: Self = serde_yaml::from_str(&content).map_err(ConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// `ConfigError` if serialization or writing fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(ConfigError::Yaml)?;
        fs::write(path, content).await.map_err(ConfigError::Io)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let capacity = self.defaults.cycle_capacity;
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "defaults.cycle_capacity",
                reason: format!("must be a non-negative number, got {capacity}"),
            }
            .into());
        }
        if self.storage.data_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.data_file",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Storage switches derived from the defaults section.
    #[must_use]
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            seed_default_labels: self.defaults.seed_labels,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{FLOWDECK_DIR_NAME}/{STORE_FILE_NAME}"),
            },
            defaults: DefaultsConfig::default(),
        }
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created `.flowdeck` directory
    pub flowdeck_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created store file
    pub store_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
}

/// Initialize a new workspace in the given directory.
///
/// # Errors
///
/// - `ConfigError::AlreadyInitialized` if `.flowdeck/` already exists
/// - `ConfigError::Io` if file system operations fail
pub async fn init(base_dir: &Path) -> Result<InitResult> {
    let flowdeck_dir = base_dir.join(FLOWDECK_DIR_NAME);

    if fs::try_exists(&flowdeck_dir).await.map_err(ConfigError::Io)? {
        return Err(ConfigError::AlreadyInitialized(flowdeck_dir).into());
    }

    fs::create_dir_all(&flowdeck_dir)
        .await
        .map_err(ConfigError::Io)?;

    let config_file = flowdeck_dir.join(CONFIG_FILE_NAME);
    WorkspaceConfig::default().save(&config_file).await?;

    let store_file = flowdeck_dir.join(STORE_FILE_NAME);
    fs::write(&store_file, "").await.map_err(ConfigError::Io)?;

    let gitignore_file = flowdeck_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Temporary files left by interrupted saves
*.tmp
";
    fs::write(&gitignore_file, gitignore_content)
        .await
        .map_err(ConfigError::Io)?;

    tracing::info!(path = %flowdeck_dir.display(), "Initialized workspace");

    Ok(InitResult {
        flowdeck_dir,
        config_file,
        store_file,
        gitignore_file,
    })
}

/// Find the workspace root by searching up the directory tree.
///
/// Returns the directory containing `.flowdeck/`, or `None` if none is found
/// before the filesystem root or [`MAX_TRAVERSAL_DEPTH`] levels.
#[must_use]
pub fn find_workspace_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(FLOWDECK_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use tempfile::TempDir;

    // ========== WorkspaceConfig Tests ==========

    #[test]
    fn test_config_default() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.storage.backend, "jsonl");
        assert_eq!(config.storage.data_file, ".flowdeck/store.jsonl");
        assert!(config.defaults.seed_labels);
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut original = WorkspaceConfig::default();
        original.defaults.seed_labels = false;
        original.save(&config_path).await.unwrap();

        let loaded = WorkspaceConfig::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_yaml_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        WorkspaceConfig::default().save(&config_path).await.unwrap();

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("backend: jsonl"));
        assert!(content.contains("data_file: .flowdeck/store.jsonl"));
        assert!(content.contains("seed_labels: true"));
    }

    #[tokio::test]
    async fn test_config_missing_defaults_section() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        tokio::fs::write(
            &config_path,
            "storage:\n  backend: memory\n  data_file: x.jsonl\n",
        )
        .await
        .unwrap();

        let loaded = WorkspaceConfig::load(&config_path).await.unwrap();
        assert_eq!(loaded.defaults, DefaultsConfig::default());
    }

    #[tokio::test]
    async fn test_config_rejects_negative_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        let mut config = WorkspaceConfig::default();
        config.defaults.cycle_capacity = -1.0;
        config.save(&config_path).await.unwrap();

        let err = WorkspaceConfig::load(&config_path).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));
    }

    #[rstest]
    #[case::jsonl("jsonl", true)]
    #[case::upper("JSONL", true)]
    #[case::memory("memory", false)]
    fn test_to_backend(#[case] backend: &str, #[case] file_backed: bool) {
        let storage = StorageConfig {
            backend: backend.to_string(),
            data_file: ".flowdeck/store.jsonl".to_string(),
        };
        let resolved = storage.to_backend(Path::new("/work")).unwrap();
        assert_eq!(resolved.data_path().is_some(), file_backed);
    }

    #[test]
    fn test_to_backend_unknown() {
        let storage = StorageConfig {
            backend: "postgres".to_string(),
            data_file: String::new(),
        };
        let err = storage.to_backend(Path::new("/work")).unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }

    // ========== Init Command Tests ==========

    #[tokio::test]
    async fn test_init_creates_directory_structure() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path()).await.unwrap();

        assert!(result.flowdeck_dir.exists());
        assert!(result.config_file.exists());
        assert!(result.store_file.exists());
        assert!(result.gitignore_file.exists());
    }

    #[tokio::test]
    async fn test_init_creates_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let result = init(temp_dir.path()).await.unwrap();

        let content = tokio::fs::read_to_string(&result.store_file).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn test_init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path()).await.unwrap();

        let err = init(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().to_lowercase().contains("already initialized"));
    }

    // ========== Root Discovery Tests ==========

    #[tokio::test]
    async fn test_find_root_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path()).await.unwrap();

        let nested = temp_dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_workspace_root(&nested).as_deref(), Some(temp_dir.path()));
    }

    #[test]
    fn test_find_root_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_workspace_root(temp_dir.path()).is_none());
    }
}
