//! Result roster validation.
//!
//! # Invariants
//! - Runs only when a race is being completed.
//! - Places follow competition ranking: tied participants share a place and
//!   the next distinct place skips by the tie-group size (1,1,3 not 1,1,2).
//! - Duplicate students in the result roster are not checked here; the
//!   storage layer's unique index is the backstop.

use super::{ResultDraft, RosterViolation};
use crate::model::race::MIN_STUDENTS;
use std::collections::BTreeMap;

/// Validates a proposed set of finishing results.
///
/// `None` entries are discarded before any rule runs. Returns the first
/// violated rule, or an empty vec when the roster is valid. Rule order:
/// 1. at least [`MIN_STUDENTS`] entries,
/// 2. every place a positive integer,
/// 3. the lowest distinct place is 1,
/// 4. each next distinct place equals the previous plus its tie count.
pub fn validate_result_roster(entries: &[Option<ResultDraft>]) -> Vec<RosterViolation> {
    let entries: Vec<&ResultDraft> = entries.iter().flatten().collect();

    if entries.len() < MIN_STUDENTS {
        return vec![RosterViolation::InsufficientParticipants];
    }

    if !entries
        .iter()
        .all(|entry| entry.place.is_some_and(|place| place > 0))
    {
        return vec![RosterViolation::InvalidPlace];
    }

    // Sorted multiplicity per distinct place; every entry has a positive
    // place at this point.
    let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
    for place in entries.iter().filter_map(|entry| entry.place) {
        *counts.entry(place).or_insert(0) += 1;
    }

    if counts.keys().next() != Some(&1) {
        return vec![RosterViolation::NonStartingRanking];
    }

    let mut expected_next = None;
    for (&place, &count) in &counts {
        if expected_next.is_some_and(|expected| place != expected) {
            return vec![RosterViolation::BrokenRankingSequence];
        }
        expected_next = Some(place + count);
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::validate_result_roster;
    use crate::validate::{ResultDraft, RosterViolation};

    fn place(value: i64) -> Option<ResultDraft> {
        Some(ResultDraft {
            place: Some(value),
            student_id: None,
        })
    }

    fn places(values: &[i64]) -> Vec<Option<ResultDraft>> {
        values.iter().map(|&value| place(value)).collect()
    }

    #[test]
    fn empty_roster_requires_minimum_participants() {
        assert_eq!(
            validate_result_roster(&[]),
            vec![RosterViolation::InsufficientParticipants]
        );
    }

    #[test]
    fn single_result_requires_minimum_participants() {
        assert_eq!(
            validate_result_roster(&places(&[1])),
            vec![RosterViolation::InsufficientParticipants]
        );
    }

    #[test]
    fn none_entries_are_discarded_before_counting() {
        let with_nulls = [place(1), None, place(2)];
        assert!(validate_result_roster(&with_nulls).is_empty());
    }

    #[test]
    fn missing_zero_and_negative_places_are_invalid() {
        let missing = Some(ResultDraft {
            place: None,
            student_id: None,
        });
        assert_eq!(
            validate_result_roster(&[missing, place(1)]),
            vec![RosterViolation::InvalidPlace]
        );
        assert_eq!(
            validate_result_roster(&places(&[0, 1])),
            vec![RosterViolation::InvalidPlace]
        );
        assert_eq!(
            validate_result_roster(&places(&[-1, 2])),
            vec![RosterViolation::InvalidPlace]
        );
    }

    #[test]
    fn places_must_start_at_one() {
        assert_eq!(
            validate_result_roster(&places(&[2, 3])),
            vec![RosterViolation::NonStartingRanking]
        );
    }

    #[test]
    fn tie_followed_by_wrong_place_breaks_ranking() {
        assert_eq!(
            validate_result_roster(&places(&[1, 1, 2])),
            vec![RosterViolation::BrokenRankingSequence]
        );
    }

    #[test]
    fn tie_followed_by_skipped_place_is_valid() {
        assert!(validate_result_roster(&places(&[1, 1, 3])).is_empty());
        assert!(validate_result_roster(&places(&[1, 2, 2, 4])).is_empty());
        assert!(validate_result_roster(&places(&[1, 1, 1, 4])).is_empty());
    }

    #[test]
    fn strictly_sequential_places_are_valid() {
        assert!(validate_result_roster(&places(&[1, 2])).is_empty());
        assert!(validate_result_roster(&places(&[3, 1, 2])).is_empty());
    }

    #[test]
    fn broken_ranking_message_is_verbatim() {
        let violations = validate_result_roster(&places(&[1, 1, 2]));
        assert_eq!(
            violations[0].message(),
            "Places must follow competition ranking (e.g. 1,1,3 or 1,2,2,4)."
        );
    }

    #[test]
    fn validation_is_pure() {
        let roster = places(&[2, 3]);
        assert_eq!(
            validate_result_roster(&roster),
            validate_result_roster(&roster)
        );
    }
}
