//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for students and races.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes run model `validate()` before SQL mutations.
//! - Roster replacement and race completion are single transactions.
//! - Repository APIs return semantic errors (`RaceNotFound`) in addition to
//!   DB transport errors.

use crate::db::DbError;
use crate::model::race::{RaceId, RaceValidationError};
use crate::model::student::StudentValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod race_repo;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for race day persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Race(RaceValidationError),
    Student(StudentValidationError),
    Db(DbError),
    RaceNotFound(RaceId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Race(err) => write!(f, "{err}"),
            Self::Student(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::RaceNotFound(id) => write!(f, "race not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Race(err) => Some(err),
            Self::Student(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::RaceNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RaceValidationError> for RepoError {
    fn from(value: RaceValidationError) -> Self {
        Self::Race(value)
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Student(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
