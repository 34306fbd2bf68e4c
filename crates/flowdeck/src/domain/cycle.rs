//! Development cycles (sprints).

use super::ids::{CycleId, ProjectId};
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Capacity in hours for cycles created without one
pub const DEFAULT_CYCLE_CAPACITY: f64 = 40.0;

/// Capacity of the two-week sprint template
pub const SPRINT_CAPACITY: f64 = 80.0;

/// A bounded time period with a capacity budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    /// Unique identifier
    pub id: CycleId,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// First instant of the cycle
    pub start_date: DateTime<Utc>,

    /// Last instant of the cycle (not required to follow `start_date`)
    pub end_date: DateTime<Utc>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Archived cycles are hidden from listings
    #[serde(default)]
    pub is_archived: bool,

    /// Capacity in hours
    pub total_capacity: f64,

    /// Planned story points
    #[serde(default)]
    pub planned_points: f64,

    /// Project the cycle belongs to
    #[serde(default)]
    pub project: Option<ProjectId>,
}

impl Cycle {
    /// Whether `now` falls within `[start_date, end_date]`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }

    /// Whole days from `now` until `end_date`, truncated toward zero.
    /// Negative once the cycle is overdue.
    #[must_use]
    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        (self.end_date - now).num_days()
    }
}

/// Data for creating a cycle
#[derive(Debug, Clone)]
pub struct NewCycle {
    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Start of the cycle
    pub start_date: DateTime<Utc>,

    /// End of the cycle
    pub end_date: DateTime<Utc>,

    /// Capacity in hours
    pub total_capacity: f64,

    /// Planned story points
    pub planned_points: f64,

    /// Owning project
    pub project: Option<ProjectId>,
}

impl NewCycle {
    /// A cycle spanning `start..=end` with default capacity.
    pub fn new(
        name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            start_date,
            end_date,
            total_capacity: DEFAULT_CYCLE_CAPACITY,
            planned_points: 0.0,
            project: None,
        }
    }

    /// "Week N": Monday 00:00 through Sunday 23:59:59 of the ISO week containing `now`.
    #[must_use]
    pub fn current_week(now: DateTime<Utc>) -> Self {
        let start = week_start(now);
        let end = start + Duration::days(7) - Duration::seconds(1);
        Self::new(format!("Week {}", now.iso_week().week()), start, end)
    }

    /// "Sprint N": fourteen days from the start of the current ISO week, capacity 80.
    #[must_use]
    pub fn two_week_sprint(now: DateTime<Utc>) -> Self {
        let start = week_start(now);
        let end = start + Duration::days(14) - Duration::seconds(1);
        let mut cycle = Self::new(format!("Sprint {}", now.iso_week().week()), start, end);
        cycle.total_capacity = SPRINT_CAPACITY;
        cycle
    }

    /// Set the owning project.
    #[must_use]
    pub fn in_project(mut self, project: Option<ProjectId>) -> Self {
        self.project = project;
        self
    }

    /// Validate the input and build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty name or negative capacity/points.
    pub fn build(self, now: DateTime<Utc>) -> Result<Cycle, ValidationError> {
        let name = validate::non_empty("name", &self.name)?;
        let total_capacity = validate::non_negative("total_capacity", self.total_capacity)?;
        let planned_points = validate::non_negative("planned_points", self.planned_points)?;

        Ok(Cycle {
            id: CycleId::new(),
            name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            is_archived: false,
            total_capacity,
            planned_points,
            project: self.project,
        })
    }
}

fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let offset = i64::from(now.weekday().num_days_from_monday());
    (now.date_naive() - Duration::days(offset))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Fields to change on an existing cycle
#[derive(Debug, Clone, Default)]
pub struct CycleUpdate {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New start date
    pub start_date: Option<DateTime<Utc>>,

    /// New end date
    pub end_date: Option<DateTime<Utc>>,

    /// New capacity
    pub total_capacity: Option<f64>,

    /// New planned points
    pub planned_points: Option<f64>,
}

impl CycleUpdate {
    /// Apply to `cycle`, validating every field first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] and leaves `cycle` unchanged on invalid input.
    pub fn apply_to(self, cycle: &mut Cycle) -> Result<(), ValidationError> {
        let name = self
            .name
            .map(|n| validate::non_empty("name", &n))
            .transpose()?;
        let capacity = self
            .total_capacity
            .map(|c| validate::non_negative("total_capacity", c))
            .transpose()?;
        let points = self
            .planned_points
            .map(|p| validate::non_negative("planned_points", p))
            .transpose()?;

        if let Some(name) = name {
            cycle.name = name;
        }
        if let Some(description) = self.description {
            cycle.description = description;
        }
        if let Some(start) = self.start_date {
            cycle.start_date = start;
        }
        if let Some(end) = self.end_date {
            cycle.end_date = end;
        }
        if let Some(capacity) = capacity {
            cycle.total_capacity = capacity;
        }
        if let Some(points) = points {
            cycle.planned_points = points;
        }
        Ok(())
    }
}
