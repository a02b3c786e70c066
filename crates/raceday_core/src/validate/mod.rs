//! Roster validation engine.
//!
//! # Responsibility
//! - Decide whether a proposed lane roster or result roster is internally
//!   consistent, as pure functions over plain draft data.
//! - Report violations as structured values the caller can render verbatim.
//!
//! # Invariants
//! - Validators are pure: identical input always yields the identical
//!   violation list.
//! - Rules run in a fixed order and short-circuit on the first violation,
//!   so the caller sees one deterministic message per roster.
//! - Validators never panic on expected rule violations.

use crate::model::race::MIN_STUDENTS;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

mod lane_roster;
mod result_roster;

pub use lane_roster::validate_lane_roster;
pub use result_roster::validate_result_roster;

/// Proposed lane entry as supplied by the editing caller.
///
/// Fields are optional because callers may submit partially built rows;
/// `remove` mirrors the caller's mark-for-removal state and excludes the
/// entry from validation and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDraft {
    pub lane_number: Option<i64>,
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remove: bool,
}

/// Proposed finishing entry as supplied by the completing caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDraft {
    pub place: Option<i64>,
    pub student_id: Option<String>,
}

/// A single violated roster rule.
///
/// `Display` renders the human-readable message shown to end users; the
/// variant itself is the machine-readable taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterViolation {
    InsufficientParticipants,
    InvalidLaneNumber,
    DuplicateLaneNumber,
    MissingStudent,
    DuplicateStudentInLanes,
    InvalidPlace,
    NonStartingRanking,
    BrokenRankingSequence,
}

impl RosterViolation {
    /// The user-facing message for this violation.
    pub fn message(self) -> String {
        match self {
            Self::InsufficientParticipants => {
                format!("At least {MIN_STUDENTS} students are required.")
            }
            Self::InvalidLaneNumber => "Lane numbers must be positive integers.".to_string(),
            Self::DuplicateLaneNumber => {
                "Different students cannot be assigned to the same lane.".to_string()
            }
            Self::MissingStudent => "Each lane must have a student.".to_string(),
            Self::DuplicateStudentInLanes => {
                "The same student cannot be assigned to more than one lane.".to_string()
            }
            Self::InvalidPlace => "Places must be positive integers.".to_string(),
            Self::NonStartingRanking => "Places must start at 1.".to_string(),
            Self::BrokenRankingSequence => {
                "Places must follow competition ranking (e.g. 1,1,3 or 1,2,2,4).".to_string()
            }
        }
    }
}

impl Display for RosterViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Serialize for RosterViolation {
    /// Violations cross the API boundary as their verbatim messages.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message())
    }
}

/// Violations grouped by the field group they apply to.
///
/// Mirrors the shape the presentation collaborator renders: lane errors
/// attached to `lane_assignments`, result errors to `race_results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub lane_assignments: Vec<RosterViolation>,
    pub race_results: Vec<RosterViolation>,
}

impl ValidationReport {
    /// Report carrying only lane-roster violations.
    pub fn lanes(violations: Vec<RosterViolation>) -> Self {
        Self {
            lane_assignments: violations,
            ..Self::default()
        }
    }

    /// True when no rule was violated in either group.
    pub fn is_empty(&self) -> bool {
        self.lane_assignments.is_empty() && self.race_results.is_empty()
    }

    /// All messages in group order, for log lines and flat error displays.
    pub fn messages(&self) -> Vec<String> {
        self.lane_assignments
            .iter()
            .chain(self.race_results.iter())
            .map(|violation| violation.message())
            .collect()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join(" "))
    }
}
