//! Race aggregate model.
//!
//! # Responsibility
//! - Define the race record, its status state machine and roster rows.
//!
//! # Invariants
//! - `RaceStatus` has exactly one legal transition, `Draft` -> `Completed`;
//!   there is no path back to `Draft`.
//! - Roster rows are owned by their race and are removed with it.

use crate::model::student::StudentId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a race.
pub type RaceId = Uuid;

/// Minimum participant count for a race to be saveable or completable.
pub const MIN_STUDENTS: usize = 2;

/// Lifecycle state of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceStatus {
    /// Lane roster is still editable; no results recorded.
    Draft,
    /// Results are locked in. Terminal state.
    Completed,
}

impl RaceStatus {
    /// Whether results may still be submitted for this status.
    pub fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Stable lowercase label, also used as the storage encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Completed => "completed",
        }
    }
}

impl Display for RaceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A school race with a name and a lifecycle status.
///
/// Roster rows are stored separately and joined back via [`RaceDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    pub status: RaceStatus,
}

/// Validation failures for race records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceValidationError {
    BlankName,
}

impl Display for RaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name can't be blank"),
        }
    }
}

impl Error for RaceValidationError {}

impl Race {
    /// Creates a new draft race with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a draft race with a caller-provided stable ID.
    pub fn with_id(id: RaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: RaceStatus::Draft,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), RaceValidationError> {
        if self.name.trim().is_empty() {
            return Err(RaceValidationError::BlankName);
        }
        Ok(())
    }
}

/// A persisted (lane number, student) pair for one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneAssignment {
    pub race_id: RaceId,
    pub student_id: StudentId,
    pub lane_number: i64,
}

/// A persisted (place, student) pair recording one race outcome.
///
/// Ties are repeated integer places; fractional placements do not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub race_id: RaceId,
    pub student_id: StudentId,
    pub place: i64,
}

/// Read aggregate joining a race with both of its rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDetail {
    pub race: Race,
    pub lane_assignments: Vec<LaneAssignment>,
    pub race_results: Vec<RaceResult>,
}

#[cfg(test)]
mod tests {
    use super::{Race, RaceStatus, RaceValidationError};

    #[test]
    fn new_race_starts_as_draft() {
        let race = Race::new("Year 4 sprint");
        assert_eq!(race.status, RaceStatus::Draft);
        assert!(race.status.is_draft());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let race = Race::new("   ");
        assert_eq!(race.validate().unwrap_err(), RaceValidationError::BlankName);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_value(RaceStatus::Completed).unwrap();
        assert_eq!(json, "completed");
    }
}
