//! Lane roster validation.
//!
//! # Invariants
//! - Runs on every lane-roster save, in both draft and completed states.
//! - Rule order is fixed and short-circuits on the first violation.

use super::{LaneDraft, RosterViolation};
use crate::model::race::MIN_STUDENTS;
use std::collections::HashSet;

/// Validates a proposed set of lane assignments.
///
/// `None` entries and entries flagged `remove` are discarded before any
/// rule runs; they represent partially built or withdrawn caller state.
///
/// Returns the first violated rule, or an empty vec when the roster is
/// valid. Rule order:
/// 1. at least [`MIN_STUDENTS`] entries,
/// 2. every lane number a positive integer,
/// 3. lane numbers pairwise distinct,
/// 4. every entry referencing a non-blank student,
/// 5. students pairwise distinct.
pub fn validate_lane_roster(entries: &[Option<LaneDraft>]) -> Vec<RosterViolation> {
    let entries: Vec<&LaneDraft> = entries
        .iter()
        .flatten()
        .filter(|entry| !entry.remove)
        .collect();

    if entries.len() < MIN_STUDENTS {
        return vec![RosterViolation::InsufficientParticipants];
    }

    if !entries
        .iter()
        .all(|entry| entry.lane_number.is_some_and(|lane| lane > 0))
    {
        return vec![RosterViolation::InvalidLaneNumber];
    }

    let mut lanes = HashSet::new();
    if !entries.iter().all(|entry| lanes.insert(entry.lane_number)) {
        return vec![RosterViolation::DuplicateLaneNumber];
    }

    // Student uniqueness compares raw identifiers; only the presence check
    // trims whitespace.
    if entries
        .iter()
        .any(|entry| entry.student_id.as_deref().map_or(true, |id| id.trim().is_empty()))
    {
        return vec![RosterViolation::MissingStudent];
    }

    let mut students = HashSet::new();
    if !entries
        .iter()
        .all(|entry| students.insert(entry.student_id.as_deref()))
    {
        return vec![RosterViolation::DuplicateStudentInLanes];
    }

    Vec::new()
}
