//! Projects: the top-level owners of issues and labels.

use super::ids::ProjectId;
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Icon given to projects created without one
pub const DEFAULT_PROJECT_ICON: &str = "folder.fill";

/// Color given to projects created without one
pub const DEFAULT_PROJECT_COLOR: &str = "007AFF";

/// A project grouping issues, labels and cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Symbol name shown next to the project
    pub icon: String,

    /// Six-digit hex color without `#`
    pub color: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation of the project
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Project name
    pub name: String,

    /// Description
    pub description: String,

    /// Icon (defaults to [`DEFAULT_PROJECT_ICON`])
    pub icon: Option<String>,

    /// Hex color (defaults to [`DEFAULT_PROJECT_COLOR`])
    pub color: Option<String>,
}

impl NewProject {
    /// A project with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: None,
            color: None,
        }
    }

    /// Validate the input and build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty name or malformed color.
    pub fn build(self, now: DateTime<Utc>) -> Result<Project, ValidationError> {
        let name = validate::non_empty("name", &self.name)?;
        let color = match self.color {
            Some(c) => validate::color(&c)?,
            None => DEFAULT_PROJECT_COLOR.to_string(),
        };
        let icon = self
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT_ICON.to_string());

        Ok(Project {
            id: ProjectId::new(),
            name,
            description: self.description,
            icon,
            color,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields to change on an existing project
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New icon
    pub icon: Option<String>,

    /// New color
    pub color: Option<String>,
}

impl ProjectUpdate {
    /// Apply to `project`, validating every field before touching it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] and leaves `project` unchanged on invalid input.
    pub fn apply_to(
        self,
        project: &mut Project,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let name = self
            .name
            .map(|n| validate::non_empty("name", &n))
            .transpose()?;
        let color = self.color.map(|c| validate::color(&c)).transpose()?;

        if let Some(name) = name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(icon) = self.icon {
            project.icon = icon;
        }
        if let Some(color) = color {
            project.color = color;
        }
        project.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_defaults() {
        let project = NewProject::named("CodingFlow").build(Utc::now()).unwrap();
        assert_eq!(project.icon, DEFAULT_PROJECT_ICON);
        assert_eq!(project.color, DEFAULT_PROJECT_COLOR);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn build_rejects_blank_name() {
        let err = NewProject::named("   ").build(Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn failed_update_leaves_project_untouched() {
        let mut project = NewProject::named("Alpha").build(Utc::now()).unwrap();
        let before = project.clone();

        let update = ProjectUpdate {
            name: Some("Beta".into()),
            color: Some("nope".into()),
            ..Default::default()
        };
        assert!(update.apply_to(&mut project, Utc::now()).is_err());
        assert_eq!(project, before);
    }
}
