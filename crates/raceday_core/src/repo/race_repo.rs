//! Race repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs for races and their lane/result rosters.
//! - Own the transactional boundaries for roster replacement and race
//!   completion.
//!
//! # Invariants
//! - `replace_lane_assignments` swaps the whole lane roster in a single
//!   transaction.
//! - `complete_race` flips the status and writes the result roster in a
//!   single transaction; no partial commit is observable.
//! - `race_results` uniqueness per (race, student) is enforced by the
//!   schema, not re-checked here.
//! - Status changes never go through `update_race`; completion is the only
//!   write path that touches `status`.

use crate::model::race::{LaneAssignment, Race, RaceId, RaceResult, RaceStatus};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const RACE_SELECT_SQL: &str = "SELECT id, name, status FROM races";

/// Repository interface for race and roster persistence.
pub trait RaceRepository {
    fn create_race(&self, race: &Race) -> RepoResult<RaceId>;
    /// Updates mutable race fields (currently the name).
    fn update_race(&self, race: &Race) -> RepoResult<()>;
    fn get_race(&self, id: RaceId) -> RepoResult<Option<Race>>;
    fn list_races(&self) -> RepoResult<Vec<Race>>;
    /// Deletes a race; roster rows cascade with it.
    fn delete_race(&self, id: RaceId) -> RepoResult<()>;
    fn list_lane_assignments(&self, race_id: RaceId) -> RepoResult<Vec<LaneAssignment>>;
    fn list_race_results(&self, race_id: RaceId) -> RepoResult<Vec<RaceResult>>;
    /// Replaces the full lane roster for one race in one transaction.
    fn replace_lane_assignments(
        &mut self,
        race_id: RaceId,
        rows: &[LaneAssignment],
    ) -> RepoResult<()>;
    /// Marks the race completed and writes its result roster atomically.
    fn complete_race(&mut self, race_id: RaceId, results: &[RaceResult]) -> RepoResult<()>;
}

/// SQLite-backed race repository.
pub struct SqliteRaceRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRaceRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl RaceRepository for SqliteRaceRepository<'_> {
    fn create_race(&self, race: &Race) -> RepoResult<RaceId> {
        race.validate()?;

        self.conn.execute(
            "INSERT INTO races (id, name, status) VALUES (?1, ?2, ?3);",
            params![
                race.id.to_string(),
                race.name.as_str(),
                race.status.as_str(),
            ],
        )?;

        Ok(race.id)
    }

    fn update_race(&self, race: &Race) -> RepoResult<()> {
        race.validate()?;

        let changed = self.conn.execute(
            "UPDATE races
             SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![race.name.as_str(), race.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::RaceNotFound(race.id));
        }

        Ok(())
    }

    fn get_race(&self, id: RaceId) -> RepoResult<Option<Race>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RACE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_race_row(row)?));
        }

        Ok(None)
    }

    fn list_races(&self) -> RepoResult<Vec<Race>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RACE_SELECT_SQL} ORDER BY created_at, id;"))?;

        let mut rows = stmt.query([])?;
        let mut races = Vec::new();
        while let Some(row) = rows.next()? {
            races.push(parse_race_row(row)?);
        }

        Ok(races)
    }

    fn delete_race(&self, id: RaceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM races WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::RaceNotFound(id));
        }

        Ok(())
    }

    fn list_lane_assignments(&self, race_id: RaceId) -> RepoResult<Vec<LaneAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT race_id, student_id, lane_number
             FROM lane_assignments
             WHERE race_id = ?1
             ORDER BY lane_number;",
        )?;

        let mut rows = stmt.query([race_id.to_string()])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(LaneAssignment {
                race_id: parse_uuid_column(row, "race_id")?,
                student_id: parse_uuid_column(row, "student_id")?,
                lane_number: row.get("lane_number")?,
            });
        }

        Ok(assignments)
    }

    fn list_race_results(&self, race_id: RaceId) -> RepoResult<Vec<RaceResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT race_id, student_id, place
             FROM race_results
             WHERE race_id = ?1
             ORDER BY place, student_id;",
        )?;

        let mut rows = stmt.query([race_id.to_string()])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            results.push(RaceResult {
                race_id: parse_uuid_column(row, "race_id")?,
                student_id: parse_uuid_column(row, "student_id")?,
                place: row.get("place")?,
            });
        }

        Ok(results)
    }

    fn replace_lane_assignments(
        &mut self,
        race_id: RaceId,
        rows: &[LaneAssignment],
    ) -> RepoResult<()> {
        let tx = self.conn.transaction()?;

        let race_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM races WHERE id = ?1);",
            [race_id.to_string()],
            |row| row.get(0),
        )?;
        if race_exists == 0 {
            return Err(RepoError::RaceNotFound(race_id));
        }

        tx.execute(
            "DELETE FROM lane_assignments WHERE race_id = ?1;",
            [race_id.to_string()],
        )?;
        for row in rows {
            tx.execute(
                "INSERT INTO lane_assignments (race_id, student_id, lane_number)
                 VALUES (?1, ?2, ?3);",
                params![
                    race_id.to_string(),
                    row.student_id.to_string(),
                    row.lane_number,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn complete_race(&mut self, race_id: RaceId, results: &[RaceResult]) -> RepoResult<()> {
        let tx = self.conn.transaction()?;

        let changed = tx.execute(
            "UPDATE races
             SET status = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![RaceStatus::Completed.as_str(), race_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::RaceNotFound(race_id));
        }

        // A schema violation on any insert (duplicate student, unknown
        // student) aborts the whole transaction, status flip included.
        for result in results {
            tx.execute(
                "INSERT INTO race_results (race_id, student_id, place)
                 VALUES (?1, ?2, ?3);",
                params![
                    race_id.to_string(),
                    result.student_id.to_string(),
                    result.place,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn parse_race_row(row: &Row<'_>) -> RepoResult<Race> {
    let id = parse_uuid_column(row, "id")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in races.status"))
    })?;

    let race = Race {
        id,
        name: row.get("name")?,
        status,
    };
    race.validate()?;
    Ok(race)
}

fn parse_uuid_column(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn parse_status(value: &str) -> Option<RaceStatus> {
    match value {
        "draft" => Some(RaceStatus::Draft),
        "completed" => Some(RaceStatus::Completed),
        _ => None,
    }
}
