//! Race lifecycle service.
//!
//! # Responsibility
//! - Gate every lane-roster save behind lane validation.
//! - Own the `Draft` -> `Completed` transition: validate both rosters, then
//!   commit the status flip and the result roster as one atomic unit.
//!
//! # Invariants
//! - Lane validation runs on every save regardless of status; result
//!   validation runs only on completion.
//! - A rejected save or completion persists nothing.
//! - Completing an already completed race fails without re-validating.

use crate::model::race::{LaneAssignment, Race, RaceDetail, RaceId, RaceResult, RaceStatus};
use crate::model::student::StudentId;
use crate::repo::race_repo::RaceRepository;
use crate::repo::RepoError;
use crate::validate::{
    validate_lane_roster, validate_result_roster, LaneDraft, ResultDraft, ValidationReport,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for race use-cases.
#[derive(Debug)]
pub enum RaceServiceError {
    /// One or both rosters violated a validation rule. Carries the grouped
    /// report for the caller to render verbatim.
    Validation(ValidationReport),
    /// `complete_race` called on a race that is not in draft.
    InvalidTransition { race_id: RaceId, status: RaceStatus },
    /// Target race does not exist.
    RaceNotFound(RaceId),
    /// A draft entry references a student id that is not a UUID.
    InvalidStudentId(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between validation and row building.
    InconsistentState(&'static str),
}

impl Display for RaceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(report) => write!(f, "validation failed: {report}"),
            Self::InvalidTransition { race_id, status } => write!(
                f,
                "invalid transition: race {race_id} is already {status}"
            ),
            Self::RaceNotFound(id) => write!(f, "race not found: {id}"),
            Self::InvalidStudentId(value) => write!(f, "invalid student id: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(message) => write!(f, "inconsistent state: {message}"),
        }
    }
}

impl Error for RaceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RaceServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service owning race CRUD and the completion lifecycle.
pub struct RaceService<R: RaceRepository> {
    repo: R,
}

impl<R: RaceRepository> RaceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new draft race.
    pub fn create_race(&self, name: impl Into<String>) -> Result<Race, RaceServiceError> {
        let race = Race::new(name);
        self.repo.create_race(&race)?;
        info!(
            "event=race_create module=service status=ok race_id={}",
            race.id
        );
        Ok(race)
    }

    /// Renames an existing race. Status is untouched.
    pub fn rename_race(&self, race_id: RaceId, name: &str) -> Result<Race, RaceServiceError> {
        let mut race = self.require_race(race_id)?;
        race.name = name.to_string();
        self.repo.update_race(&race)?;
        Ok(race)
    }

    /// Lists all races without their rosters.
    pub fn list_races(&self) -> Result<Vec<Race>, RaceServiceError> {
        Ok(self.repo.list_races()?)
    }

    /// Loads one race joined with both of its rosters.
    pub fn get_race_detail(&self, race_id: RaceId) -> Result<RaceDetail, RaceServiceError> {
        let race = self.require_race(race_id)?;
        let lane_assignments = self.repo.list_lane_assignments(race_id)?;
        let race_results = self.repo.list_race_results(race_id)?;
        Ok(RaceDetail {
            race,
            lane_assignments,
            race_results,
        })
    }

    /// Deletes a race together with its rosters.
    pub fn delete_race(&self, race_id: RaceId) -> Result<(), RaceServiceError> {
        self.repo.delete_race(race_id)?;
        info!("event=race_delete module=service status=ok race_id={race_id}");
        Ok(())
    }

    /// Validates and persists a proposed lane roster.
    ///
    /// Lane validation runs here on every save, for draft and completed
    /// races alike. On violations nothing is persisted and the grouped
    /// report is returned.
    pub fn save_lane_roster(
        &mut self,
        race_id: RaceId,
        entries: &[Option<LaneDraft>],
    ) -> Result<Vec<LaneAssignment>, RaceServiceError> {
        self.require_race(race_id)?;

        let violations = validate_lane_roster(entries);
        if !violations.is_empty() {
            let report = ValidationReport::lanes(violations);
            warn!(
                "event=lane_roster_save module=service status=rejected race_id={race_id} errors=\"{report}\""
            );
            return Err(RaceServiceError::Validation(report));
        }

        let rows = lane_rows(race_id, entries)?;
        self.repo.replace_lane_assignments(race_id, &rows)?;
        info!(
            "event=lane_roster_save module=service status=ok race_id={race_id} lanes={}",
            rows.len()
        );
        Ok(rows)
    }

    /// Performs the `Draft` -> `Completed` transition.
    ///
    /// Re-validates the stored lane roster and validates the proposed
    /// result roster; on any violation the transition aborts with the union
    /// report and no state change. When both pass, the status flip and the
    /// result-roster write commit as one transaction.
    ///
    /// # Errors
    /// - [`RaceServiceError::InvalidTransition`] when the race is already
    ///   completed; the rosters are not re-validated in that case.
    /// - [`RaceServiceError::Validation`] with lane violations under
    ///   `lane_assignments` and result violations under `race_results`.
    pub fn complete_race(
        &mut self,
        race_id: RaceId,
        results: &[Option<ResultDraft>],
    ) -> Result<RaceDetail, RaceServiceError> {
        let race = self.require_race(race_id)?;
        match race.status {
            RaceStatus::Completed => {
                warn!(
                    "event=race_complete module=service status=invalid_transition race_id={race_id}"
                );
                return Err(RaceServiceError::InvalidTransition {
                    race_id,
                    status: race.status,
                });
            }
            RaceStatus::Draft => {}
        }

        let stored_lanes = self.repo.list_lane_assignments(race_id)?;
        let lane_drafts: Vec<Option<LaneDraft>> =
            stored_lanes.iter().map(|row| Some(row.into())).collect();

        let report = ValidationReport {
            lane_assignments: validate_lane_roster(&lane_drafts),
            race_results: validate_result_roster(results),
        };
        if !report.is_empty() {
            warn!(
                "event=race_complete module=service status=rejected race_id={race_id} errors=\"{report}\""
            );
            return Err(RaceServiceError::Validation(report));
        }

        let rows = result_rows(race_id, results)?;
        self.repo.complete_race(race_id, &rows)?;
        info!(
            "event=race_complete module=service status=ok race_id={race_id} results={}",
            rows.len()
        );

        self.get_race_detail(race_id)
    }

    fn require_race(&self, race_id: RaceId) -> Result<Race, RaceServiceError> {
        self.repo
            .get_race(race_id)?
            .ok_or(RaceServiceError::RaceNotFound(race_id))
    }
}

impl From<&LaneAssignment> for LaneDraft {
    /// Stored rows re-enter validation as fully populated drafts.
    fn from(row: &LaneAssignment) -> Self {
        Self {
            lane_number: Some(row.lane_number),
            student_id: Some(row.student_id.to_string()),
            remove: false,
        }
    }
}

fn lane_rows(
    race_id: RaceId,
    entries: &[Option<LaneDraft>],
) -> Result<Vec<LaneAssignment>, RaceServiceError> {
    entries
        .iter()
        .flatten()
        .filter(|entry| !entry.remove)
        .map(|entry| {
            let lane_number = entry
                .lane_number
                .ok_or(RaceServiceError::InconsistentState(
                    "validated lane entry has no lane number",
                ))?;
            Ok(LaneAssignment {
                race_id,
                student_id: parse_student_id(entry.student_id.as_deref())?,
                lane_number,
            })
        })
        .collect()
}

fn result_rows(
    race_id: RaceId,
    entries: &[Option<ResultDraft>],
) -> Result<Vec<RaceResult>, RaceServiceError> {
    entries
        .iter()
        .flatten()
        .map(|entry| {
            let place = entry.place.ok_or(RaceServiceError::InconsistentState(
                "validated result entry has no place",
            ))?;
            Ok(RaceResult {
                race_id,
                student_id: parse_student_id(entry.student_id.as_deref())?,
                place,
            })
        })
        .collect()
}

fn parse_student_id(raw: Option<&str>) -> Result<StudentId, RaceServiceError> {
    let trimmed = raw.unwrap_or_default().trim();
    Uuid::parse_str(trimmed)
        .map_err(|_| RaceServiceError::InvalidStudentId(trimmed.to_string()))
}
