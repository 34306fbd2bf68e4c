//! Issue labels.

use super::ids::{LabelId, ProjectId};
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color given to labels created without one
pub const DEFAULT_LABEL_COLOR: &str = "FF9500";

/// Icon given to labels created without one
pub const DEFAULT_LABEL_ICON: &str = "tag.fill";

/// Labels seeded into every new project: (name, color, icon)
pub const DEFAULT_LABELS: [(&str, &str, &str); 5] = [
    ("Feature", "34C759", "star.fill"),
    ("Bug", "FF3B30", "ladybug.fill"),
    ("Tech Debt", "FF9500", "wrench.fill"),
    ("Research", "5856D6", "magnifyingglass"),
    ("AI Generated", "00C7BE", "sparkles"),
];

/// A colored tag attachable to issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLabel {
    /// Unique identifier
    pub id: LabelId,

    /// Label name
    pub name: String,

    /// Six-digit hex color
    pub color: String,

    /// Symbol name
    pub icon: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Project this label belongs to, if any
    pub project: Option<ProjectId>,
}

/// Data for creating a label
#[derive(Debug, Clone)]
pub struct NewLabel {
    /// Label name
    pub name: String,

    /// Hex color (defaults to [`DEFAULT_LABEL_COLOR`])
    pub color: Option<String>,

    /// Icon (defaults to [`DEFAULT_LABEL_ICON`])
    pub icon: Option<String>,

    /// Owning project
    pub project: Option<ProjectId>,
}

impl NewLabel {
    /// A label with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            icon: None,
            project: None,
        }
    }

    /// The default label set for `project`.
    pub fn defaults_for(project: ProjectId) -> impl Iterator<Item = NewLabel> {
        DEFAULT_LABELS.iter().map(move |(name, color, icon)| NewLabel {
            name: (*name).to_string(),
            color: Some((*color).to_string()),
            icon: Some((*icon).to_string()),
            project: Some(project),
        })
    }

    /// Validate the input and build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty name or malformed color.
    pub fn build(self, now: DateTime<Utc>) -> Result<IssueLabel, ValidationError> {
        let name = validate::non_empty("name", &self.name)?;
        let color = match self.color {
            Some(c) => validate::color(&c)?,
            None => DEFAULT_LABEL_COLOR.to_string(),
        };
        Ok(IssueLabel {
            id: LabelId::new(),
            name,
            color,
            icon: self
                .icon
                .unwrap_or_else(|| DEFAULT_LABEL_ICON.to_string()),
            created_at: now,
            project: self.project,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_seed_labels() {
        let project = ProjectId::new();
        let labels: Vec<_> = NewLabel::defaults_for(project)
            .map(|l| l.build(Utc::now()).unwrap())
            .collect();

        assert_eq!(labels.len(), 5);
        assert_eq!(labels[1].name, "Bug");
        assert_eq!(labels[1].color, "FF3B30");
        assert!(labels.iter().all(|l| l.project == Some(project)));
    }

    #[test]
    fn build_uses_default_color_and_icon() {
        let label = NewLabel::named("Docs").build(Utc::now()).unwrap();
        assert_eq!(label.color, DEFAULT_LABEL_COLOR);
        assert_eq!(label.icon, DEFAULT_LABEL_ICON);
    }
}
