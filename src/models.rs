//! Domain models passed between the record store, the list pipeline and the
//! TUI. These stay plain data holders: validation lives at the form boundary
//! (`crate::validation`) and ownership of the collection lives in
//! `crate::store`.

use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

/// Opaque identifier assigned by the record store when a student is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentId(Uuid);

impl StudentId {
    /// Generate a fresh random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed set of gender options offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    PreferNotToSay,
}

impl Gender {
    /// Every option in the order the form cycles through them.
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }

    /// Parse one of the display labels back into a variant.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactInfo {
    /// Always formatted as `(XXX) XXX-XXXX` once it passed validation.
    pub phone: String,
    pub email: String,
}

/// One entry of the read-only course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A stored student record. Only the record store builds these, which is how
/// `id` stays unique and immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub year_of_admission: i32,
    pub course_id: String,
    pub address: Address,
    pub contact_info: ContactInfo,
}

impl Student {
    /// Rebuild the form payload for this record, e.g. to seed an edit form.
    pub fn to_form_data(&self) -> StudentFormData {
        StudentFormData {
            name: self.name.clone(),
            gender: self.gender,
            date_of_birth: self.date_of_birth.format(DATE_INPUT_FORMAT).to_string(),
            year_of_admission: self.year_of_admission,
            course_id: self.course_id.clone(),
            address: self.address.clone(),
            contact_info: self.contact_info.clone(),
        }
    }

    /// Long-form birth date used by the details view (`March 4, 2001`).
    pub fn display_birth_date(&self) -> String {
        self.date_of_birth.format("%B %-d, %Y").to_string()
    }
}

/// Text layout of `StudentFormData::date_of_birth`.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Validated input used to create or replace a student. Everything except the
/// identifier, with the birth date still in its `YYYY-MM-DD` text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFormData {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub year_of_admission: i32,
    pub course_id: String,
    pub address: Address,
    pub contact_info: ContactInfo,
}
