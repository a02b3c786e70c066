use raceday_core::db::open_db_in_memory;
use raceday_core::{
    LaneDraft, RaceService, RaceServiceError, RaceValidationError, RepoError,
    SqliteRaceRepository, SqliteStudentRepository, StudentService, StudentValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn lane(lane_number: i64, student_id: Uuid) -> Option<LaneDraft> {
    Some(LaneDraft {
        lane_number: Some(lane_number),
        student_id: Some(student_id.to_string()),
        remove: false,
    })
}

#[test]
fn create_and_get_student_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::new(&conn));

    let created = service.create_student("Ada", "Lovelace").unwrap();
    let loaded = service.get_student(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.full_name(), "Ada Lovelace");
}

#[test]
fn create_student_rejects_blank_names() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::new(&conn));

    let err = service.create_student("  ", "Lovelace").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Student(StudentValidationError::BlankFirstName)
    ));

    assert!(service.list_students().unwrap().is_empty());
}

#[test]
fn list_students_orders_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::new(&conn));

    service.create_student("Grace", "Hopper").unwrap();
    service.create_student("Ada", "Lovelace").unwrap();
    service.create_student("Alan", "Hopper").unwrap();

    let names: Vec<String> = service
        .list_students()
        .unwrap()
        .iter()
        .map(|student| student.full_name())
        .collect();
    assert_eq!(names, vec!["Alan Hopper", "Grace Hopper", "Ada Lovelace"]);
}

#[test]
fn get_missing_student_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::new(&conn));

    assert!(service.get_student(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn create_race_rejects_blank_name() {
    let mut conn = open_db_in_memory().unwrap();
    let service = RaceService::new(SqliteRaceRepository::new(&mut conn));

    let err = service.create_race("   ").unwrap_err();
    assert!(matches!(
        err,
        RaceServiceError::Repo(RepoError::Race(RaceValidationError::BlankName))
    ));
    assert!(service.list_races().unwrap().is_empty());
}

#[test]
fn rename_race_updates_name_and_keeps_status() {
    let mut conn = open_db_in_memory().unwrap();
    let service = RaceService::new(SqliteRaceRepository::new(&mut conn));

    let race = service.create_race("Sports day heat").unwrap();
    let renamed = service.rename_race(race.id, "Sports day final").unwrap();
    assert_eq!(renamed.name, "Sports day final");
    assert_eq!(renamed.status, race.status);

    let listed = service.list_races().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Sports day final");
}

#[test]
fn rename_missing_race_fails_with_race_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let service = RaceService::new(SqliteRaceRepository::new(&mut conn));

    let missing = Uuid::new_v4();
    let err = service.rename_race(missing, "Ghost race").unwrap_err();
    assert!(matches!(err, RaceServiceError::RaceNotFound(id) if id == missing));
}

#[test]
fn delete_race_cascades_roster_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let students: Vec<Uuid> = {
        let service = StudentService::new(SqliteStudentRepository::new(&conn));
        (0..2)
            .map(|index| {
                service
                    .create_student(format!("First{index}"), format!("Last{index}"))
                    .unwrap()
                    .id
            })
            .collect()
    };

    let race_id = {
        let mut service = RaceService::new(SqliteRaceRepository::new(&mut conn));
        let race = service.create_race("Cleanup race").unwrap();
        service
            .save_lane_roster(race.id, &[lane(1, students[0]), lane(2, students[1])])
            .unwrap();
        service.delete_race(race.id).unwrap();
        race.id
    };

    assert_eq!(count_rows(&conn, "lane_assignments", race_id), 0);
    assert_eq!(count_rows(&conn, "races", race_id), 0);
}

#[test]
fn race_detail_joins_both_rosters() {
    let mut conn = open_db_in_memory().unwrap();
    let students: Vec<Uuid> = {
        let service = StudentService::new(SqliteStudentRepository::new(&conn));
        (0..2)
            .map(|index| {
                service
                    .create_student(format!("First{index}"), format!("Last{index}"))
                    .unwrap()
                    .id
            })
            .collect()
    };

    let mut service = RaceService::new(SqliteRaceRepository::new(&mut conn));
    let race = service.create_race("Detail race").unwrap();
    service
        .save_lane_roster(race.id, &[lane(1, students[0]), lane(2, students[1])])
        .unwrap();

    let detail = service.get_race_detail(race.id).unwrap();
    assert_eq!(detail.race.id, race.id);
    assert_eq!(detail.lane_assignments.len(), 2);
    assert!(detail.race_results.is_empty());
    assert!(detail
        .lane_assignments
        .iter()
        .all(|row| row.race_id == race.id));
}

fn count_rows(conn: &Connection, table: &str, race_id: Uuid) -> i64 {
    let column = if table == "races" { "id" } else { "race_id" };
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1;"),
        [race_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}
