//! Form-boundary checks that turn the raw text of the student form into
//! [`StudentFormData`]. The store trusts whatever comes out of here, so every
//! field constraint lives in this module.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use thiserror::Error;

use crate::models::{Address, ContactInfo, Gender, StudentFormData, DATE_INPUT_FORMAT};

/// Number of admission years offered, counting back from the current year.
pub const ADMISSION_YEAR_SPAN: i32 = 10;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").expect("valid phone pattern"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email pattern")
});

/// Form fields, in the order the form renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Gender,
    DateOfBirth,
    YearOfAdmission,
    Course,
    Street,
    City,
    State,
    PostalCode,
    Phone,
    Email,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Name,
        Field::Gender,
        Field::DateOfBirth,
        Field::YearOfAdmission,
        Field::Course,
        Field::Street,
        Field::City,
        Field::State,
        Field::PostalCode,
        Field::Phone,
        Field::Email,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Gender => "Gender",
            Field::DateOfBirth => "Date of Birth",
            Field::YearOfAdmission => "Year of Admission",
            Field::Course => "Course",
            Field::Street => "Street Address",
            Field::City => "City",
            Field::State => "State",
            Field::PostalCode => "Postal Code",
            Field::Phone => "Phone Number",
            Field::Email => "Email",
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field error found in one submission, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Drop the error recorded for `field`, if any.
    pub fn remove(&mut self, field: Field) {
        self.errors.retain(|error| error.field != field);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// First message plus how many more were found.
fn summarize(errors: &[FieldError]) -> String {
    match errors {
        [] => "no validation errors".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Raw, unvalidated form input. Select fields carry typed values because the
/// form only ever offers valid choices for them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentDraft {
    pub name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: String,
    pub year_of_admission: String,
    pub course_id: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
}

/// Check every field of `draft` against the student constraints, using
/// `today` as the upper bound for dates and admission years.
pub fn validate(draft: &StudentDraft, today: NaiveDate) -> Result<StudentFormData, ValidationErrors> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.chars().count() < 2 {
        errors.push(FieldError::new(Field::Name, "Name must be at least 2 characters"));
    }

    if draft.gender.is_none() {
        errors.push(FieldError::new(Field::Gender, "Please select a gender"));
    }

    let date_of_birth = match check_date_of_birth(&draft.date_of_birth, today) {
        Ok(date) => Some(date),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    let year_of_admission = match check_admission_year(&draft.year_of_admission, today) {
        Ok(year) => Some(year),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    let course_id = draft.course_id.trim();
    if course_id.is_empty() {
        errors.push(FieldError::new(Field::Course, "Please select a course"));
    }

    for (field, value, message) in [
        (Field::Street, &draft.street, "Street address is required"),
        (Field::City, &draft.city, "City is required"),
        (Field::State, &draft.state, "State is required"),
    ] {
        if value.trim().is_empty() {
            errors.push(FieldError::new(field, message));
        }
    }

    if draft.postal_code.trim().chars().count() < 3 {
        errors.push(FieldError::new(Field::PostalCode, "Postal code is required"));
    }

    let phone = draft.phone.trim();
    if !PHONE_PATTERN.is_match(phone) {
        errors.push(FieldError::new(
            Field::Phone,
            "Phone must be in format (123) 456-7890",
        ));
    }

    let email = draft.email.trim();
    if !is_valid_email(email) {
        errors.push(FieldError::new(Field::Email, "Invalid email address"));
    }

    match (draft.gender, date_of_birth, year_of_admission) {
        (Some(gender), Some(date_of_birth), Some(year_of_admission)) if errors.is_empty() => {
            Ok(StudentFormData {
                name: name.to_string(),
                gender,
                date_of_birth: date_of_birth.format(DATE_INPUT_FORMAT).to_string(),
                year_of_admission,
                course_id: course_id.to_string(),
                address: Address {
                    street: draft.street.trim().to_string(),
                    city: draft.city.trim().to_string(),
                    state: draft.state.trim().to_string(),
                    postal_code: draft.postal_code.trim().to_string(),
                },
                contact_info: ContactInfo {
                    phone: phone.to_string(),
                    email: email.to_string(),
                },
            })
        }
        _ => Err(ValidationErrors { errors }),
    }
}

/// Earliest accepted date of birth.
pub fn earliest_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn check_date_of_birth(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new(Field::DateOfBirth, "Date of birth is required"));
    }
    let date = NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT).map_err(|_| {
        FieldError::new(
            Field::DateOfBirth,
            "Date of birth must be a valid date (YYYY-MM-DD)",
        )
    })?;
    if date < earliest_birth_date() || date > today {
        return Err(FieldError::new(
            Field::DateOfBirth,
            "Date of birth must be between 1950-01-01 and today",
        ));
    }
    Ok(date)
}

fn check_admission_year(raw: &str, today: NaiveDate) -> Result<i32, FieldError> {
    let newest = today.year();
    let oldest = newest - (ADMISSION_YEAR_SPAN - 1);
    let out_of_range = || {
        FieldError::new(
            Field::YearOfAdmission,
            format!("Year of admission must be between {oldest} and {newest}"),
        )
    };
    let year = raw.trim().parse::<i32>().map_err(|_| out_of_range())?;
    if !(oldest..=newest).contains(&year) {
        return Err(out_of_range());
    }
    Ok(year)
}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_PATTERN.is_match(email)
}

/// The admission years the form offers, newest first.
pub fn admission_years(today: NaiveDate) -> Vec<i32> {
    (0..ADMISSION_YEAR_SPAN).map(|offset| today.year() - offset).collect()
}

/// Mask free-form phone input as `(XXX) XXX-XXXX`, keeping at most ten digits
/// and formatting progressively while the user types.
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(10).collect();
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
