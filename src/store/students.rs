use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Student, StudentFormData, StudentId, DATE_INPUT_FORMAT};

use super::notice::{Notice, NoticeSink};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid date of birth: {0:?}")]
    InvalidDateOfBirth(String),
}

/// Authoritative in-memory collection of students for one session. Records
/// keep insertion order; every mutation reports its outcome to the injected
/// notice sink.
pub struct StudentStore {
    students: Vec<Student>,
    sink: Box<dyn NoticeSink>,
}

impl StudentStore {
    /// Create an empty store reporting to `sink`.
    pub fn new(sink: impl NoticeSink + 'static) -> Self {
        Self {
            students: Vec::new(),
            sink: Box::new(sink),
        }
    }

    /// Create a new student from validated form data and return the stored
    /// record. Rejects birth dates that do not parse; the collection is left
    /// untouched in that case.
    pub fn add(&mut self, data: StudentFormData) -> Result<Student, StoreError> {
        let student = match build_student(StudentId::generate(), data) {
            Ok(student) => student,
            Err(err) => {
                tracing::warn!(error = %err, "rejected new student");
                self.sink.notify(Notice::failure("Failed to add student"));
                return Err(err);
            }
        };

        self.students.push(student.clone());
        tracing::info!(id = %student.id, name = %student.name, "student added");
        self.sink.notify(Notice::success("Student added successfully"));
        Ok(student)
    }

    /// Replace every field of the student `id` except the id itself. Returns
    /// `Ok(false)` without notifying when no such student exists, whatever
    /// the data holds.
    pub fn update(&mut self, id: StudentId, data: StudentFormData) -> Result<bool, StoreError> {
        let Some(slot) = self.students.iter().position(|student| student.id == id) else {
            tracing::debug!(%id, "update ignored, student not found");
            return Ok(false);
        };

        let replacement = match build_student(id, data) {
            Ok(student) => student,
            Err(err) => {
                tracing::warn!(%id, error = %err, "rejected student update");
                self.sink.notify(Notice::failure("Failed to update student"));
                return Err(err);
            }
        };

        self.students[slot] = replacement;
        tracing::info!(%id, "student updated");
        self.sink.notify(Notice::success("Student updated successfully"));
        Ok(true)
    }

    /// Permanently remove the student `id`. Returns `false` when nothing
    /// matched.
    pub fn delete(&mut self, id: StudentId) -> bool {
        let before = self.students.len();
        self.students.retain(|student| student.id != id);
        if self.students.len() == before {
            tracing::debug!(%id, "delete ignored, student not found");
            return false;
        }

        tracing::info!(%id, "student deleted");
        self.sink.notify(Notice::success("Student deleted successfully"));
        true
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// All students in insertion order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

fn build_student(id: StudentId, data: StudentFormData) -> Result<Student, StoreError> {
    let raw = data.date_of_birth.trim();
    let date_of_birth = NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT)
        .map_err(|_| StoreError::InvalidDateOfBirth(raw.to_string()))?;

    Ok(Student {
        id,
        name: data.name,
        gender: data.gender,
        date_of_birth,
        year_of_admission: data.year_of_admission,
        course_id: data.course_id,
        address: data.address,
        contact_info: data.contact_info,
    })
}
