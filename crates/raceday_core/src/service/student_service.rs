//! Student use-case service.

use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoResult;
use log::info;

/// Use-case service wrapper for student CRUD operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new student.
    ///
    /// # Errors
    /// - Returns the repository's validation error when either name is blank.
    pub fn create_student(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> RepoResult<Student> {
        let student = Student::new(first_name, last_name);
        self.repo.create_student(&student)?;
        info!(
            "event=student_create module=service status=ok student_id={}",
            student.id
        );
        Ok(student)
    }

    /// Gets one student by stable ID.
    pub fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.get_student(id)
    }

    /// Lists all students in display order.
    pub fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.list_students()
    }
}
