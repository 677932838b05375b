use chrono::{Datelike, NaiveDate};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Gender, Student, StudentFormData, StudentId, DATE_INPUT_FORMAT};
use crate::store::CourseCatalog;
use crate::validation::{
    admission_years, format_phone_input, validate, Field, StudentDraft, ValidationErrors,
};

/// Width reserved for field labels so values line up in the modal.
pub(crate) const LABEL_WIDTH: usize = 19;

/// State of the add/edit student modal: the raw draft, the focused field and
/// whatever the last submission complained about.
#[derive(Clone)]
pub(crate) struct StudentForm {
    pub(crate) draft: StudentDraft,
    pub(crate) active: Field,
    pub(crate) errors: Option<ValidationErrors>,
    /// Failure that is not tied to a single field (e.g. the store rejected
    /// the record).
    pub(crate) error: Option<String>,
    year_options: Vec<i32>,
}

impl StudentForm {
    /// Blank form for a new student. Gender defaults to "Prefer not to say",
    /// the admission year to the current year and the course to the first
    /// catalog entry.
    pub(crate) fn new(today: NaiveDate, catalog: &CourseCatalog) -> Self {
        let draft = StudentDraft {
            gender: Some(Gender::default()),
            year_of_admission: today.year().to_string(),
            course_id: catalog
                .courses()
                .first()
                .map(|course| course.id.clone())
                .unwrap_or_default(),
            ..StudentDraft::default()
        };
        Self {
            draft,
            active: Field::Name,
            errors: None,
            error: None,
            year_options: admission_years(today),
        }
    }

    /// Populate the form from an existing student when editing.
    pub(crate) fn from_student(student: &Student, today: NaiveDate) -> Self {
        let draft = StudentDraft {
            name: student.name.clone(),
            gender: Some(student.gender),
            date_of_birth: student.date_of_birth.format(DATE_INPUT_FORMAT).to_string(),
            year_of_admission: student.year_of_admission.to_string(),
            course_id: student.course_id.clone(),
            street: student.address.street.clone(),
            city: student.address.city.clone(),
            state: student.address.state.clone(),
            postal_code: student.address.postal_code.clone(),
            phone: student.contact_info.phone.clone(),
            email: student.contact_info.email.clone(),
        };
        Self {
            draft,
            active: Field::Name,
            errors: None,
            error: None,
            year_options: admission_years(today),
        }
    }

    pub(crate) fn is_select(field: Field) -> bool {
        matches!(field, Field::Gender | Field::YearOfAdmission | Field::Course)
    }

    pub(crate) fn next_field(&mut self) {
        self.active = shift_field(self.active, 1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = shift_field(self.active, -1);
    }

    /// Append a character to the active text field. Select fields ignore
    /// typing; the phone field re-applies its mask on every keystroke.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() || Self::is_select(self.active) {
            return false;
        }
        match self.active {
            Field::DateOfBirth => {
                if !(ch.is_ascii_digit() || ch == '-') {
                    return false;
                }
                self.draft.date_of_birth.push(ch);
            }
            Field::Phone => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                let mut raw = self.draft.phone.clone();
                raw.push(ch);
                self.draft.phone = format_phone_input(&raw);
            }
            field => {
                if let Some(value) = self.text_mut(field) {
                    value.push(ch);
                }
            }
        }
        self.clear_error(self.active);
        true
    }

    /// Remove the last character of the active text field. For the phone
    /// number this drops the last digit rather than a mask character.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            Field::Phone => {
                let mut digits: String = self
                    .draft
                    .phone
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect();
                digits.pop();
                self.draft.phone = format_phone_input(&digits);
            }
            field => {
                if let Some(value) = self.text_mut(field) {
                    value.pop();
                }
            }
        }
    }

    /// Step the active select field forward or backward through its options.
    pub(crate) fn cycle(&mut self, delta: isize, catalog: &CourseCatalog) {
        match self.active {
            Field::Gender => {
                let current = self
                    .draft
                    .gender
                    .and_then(|gender| Gender::ALL.iter().position(|g| *g == gender));
                let next = step_index(current, delta, Gender::ALL.len());
                self.draft.gender = next.map(|idx| Gender::ALL[idx]);
            }
            Field::YearOfAdmission => {
                let current = self
                    .year_options
                    .iter()
                    .position(|year| year.to_string() == self.draft.year_of_admission.trim());
                if let Some(idx) = step_index(current, delta, self.year_options.len()) {
                    self.draft.year_of_admission = self.year_options[idx].to_string();
                }
            }
            Field::Course => {
                let current = catalog.position(&self.draft.course_id);
                if let Some(idx) = step_index(current, delta, catalog.len()) {
                    self.draft.course_id = catalog.courses()[idx].id.clone();
                }
            }
            _ => return,
        }
        self.clear_error(self.active);
    }

    /// Validate the draft. On failure the errors stay on the form so every
    /// offending field can be highlighted, and focus jumps to the first one.
    pub(crate) fn submit(&mut self, today: NaiveDate) -> Result<StudentFormData, ValidationErrors> {
        self.error = None;
        match validate(&self.draft, today) {
            Ok(data) => {
                self.errors = None;
                Ok(data)
            }
            Err(errors) => {
                if let Some(first) = errors.errors().first() {
                    self.active = first.field;
                }
                self.errors = Some(errors.clone());
                Err(errors)
            }
        }
    }

    pub(crate) fn field_error(&self, field: Field) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.for_field(field))
            .map(|error| error.message.as_str())
    }

    /// Text shown for `field`, resolving select values to their labels.
    pub(crate) fn display_value(&self, field: Field, catalog: &CourseCatalog) -> String {
        match field {
            Field::Gender => self
                .draft
                .gender
                .map(|gender| gender.label().to_string())
                .unwrap_or_default(),
            Field::Course => {
                if self.draft.course_id.is_empty() {
                    String::new()
                } else {
                    catalog.display_name(&self.draft.course_id).to_string()
                }
            }
            other => self.text(other).to_string(),
        }
    }

    /// Character count of the active value, used to place the cursor.
    pub(crate) fn value_len(&self, field: Field) -> usize {
        self.text(field).chars().count()
    }

    /// Render one form row: label, value (or placeholder) and select arrows.
    pub(crate) fn build_line(&self, field: Field, catalog: &CourseCatalog) -> Line<'static> {
        let value = self.display_value(field, catalog);
        let is_active = self.active == field;
        let has_error = self.field_error(field).is_some();

        let display = if value.is_empty() {
            placeholder(field).to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if has_error {
            Style::default().fg(Color::Red)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let label_style = if is_active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::styled(
            format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH),
            label_style,
        )];
        if Self::is_select(field) {
            spans.push(Span::styled(format!("‹ {display} ›"), style));
        } else {
            spans.push(Span::styled(display, style));
        }
        Line::from(spans)
    }

    fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.draft.name,
            Field::DateOfBirth => &self.draft.date_of_birth,
            Field::YearOfAdmission => &self.draft.year_of_admission,
            Field::Course => &self.draft.course_id,
            Field::Street => &self.draft.street,
            Field::City => &self.draft.city,
            Field::State => &self.draft.state,
            Field::PostalCode => &self.draft.postal_code,
            Field::Phone => &self.draft.phone,
            Field::Email => &self.draft.email,
            Field::Gender => "",
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.draft.name),
            Field::DateOfBirth => Some(&mut self.draft.date_of_birth),
            Field::Street => Some(&mut self.draft.street),
            Field::City => Some(&mut self.draft.city),
            Field::State => Some(&mut self.draft.state),
            Field::PostalCode => Some(&mut self.draft.postal_code),
            Field::Phone => Some(&mut self.draft.phone),
            Field::Email => Some(&mut self.draft.email),
            Field::Gender | Field::YearOfAdmission | Field::Course => None,
        }
    }

    fn clear_error(&mut self, field: Field) {
        self.error = None;
        if let Some(errors) = &mut self.errors {
            errors.remove(field);
            if errors.is_empty() {
                self.errors = None;
            }
        }
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::DateOfBirth => "<YYYY-MM-DD>",
        Field::Phone => "<(123) 456-7890>",
        Field::Email => "<name@example.com>",
        Field::Course => "<select>",
        _ => "<required>",
    }
}

fn shift_field(field: Field, delta: isize) -> Field {
    let len = Field::ALL.len() as isize;
    let current = Field::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(0) as isize;
    Field::ALL[(current + delta).rem_euclid(len) as usize]
}

/// Wrap-around index arithmetic for select widgets. An unset selection starts
/// at the first (or last) option.
fn step_index(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    let next = match current {
        Some(idx) => (idx as isize + delta).rem_euclid(len),
        None if delta < 0 => len - 1,
        None => 0,
    };
    Some(next as usize)
}

/// The student pending deletion, captured when the dialog opens.
#[derive(Clone)]
pub(crate) struct ConfirmStudentDelete {
    pub(crate) id: StudentId,
    pub(crate) name: String,
}

impl ConfirmStudentDelete {
    pub(crate) fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(vec![Course::new("c1", "Physics"), Course::new("c2", "Art")])
    }

    fn type_text(form: &mut StudentForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn test_new_form_defaults() {
        let form = StudentForm::new(today(), &catalog());
        assert_eq!(form.draft.gender, Some(Gender::PreferNotToSay));
        assert_eq!(form.draft.year_of_admission, "2026");
        assert_eq!(form.draft.course_id, "c1");
        assert_eq!(form.active, Field::Name);
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut form = StudentForm::new(today(), &catalog());
        form.previous_field();
        assert_eq!(form.active, Field::Email);
        form.next_field();
        form.next_field();
        assert_eq!(form.active, Field::Gender);
    }

    #[test]
    fn test_phone_is_masked_while_typing() {
        let mut form = StudentForm::new(today(), &catalog());
        form.active = Field::Phone;
        type_text(&mut form, "503a5550199");
        assert_eq!(form.draft.phone, "(503) 555-0199");
        form.backspace();
        assert_eq!(form.draft.phone, "(503) 555-019");
        form.backspace();
        form.backspace();
        form.backspace();
        assert_eq!(form.draft.phone, "(503) 555");
    }

    #[test]
    fn test_selects_ignore_typing_and_cycle() {
        let mut form = StudentForm::new(today(), &catalog());
        form.active = Field::Course;
        assert!(!form.push_char('x'));
        form.cycle(1, &catalog());
        assert_eq!(form.draft.course_id, "c2");
        form.cycle(1, &catalog());
        assert_eq!(form.draft.course_id, "c1");

        form.active = Field::YearOfAdmission;
        form.cycle(1, &catalog());
        assert_eq!(form.draft.year_of_admission, "2025");
        form.cycle(-2, &catalog());
        assert_eq!(form.draft.year_of_admission, "2017");

        form.active = Field::Gender;
        form.cycle(1, &catalog());
        assert_eq!(form.draft.gender, Some(Gender::Male));
    }

    #[test]
    fn test_submit_keeps_errors_and_focuses_first() {
        let mut form = StudentForm::new(today(), &catalog());
        form.active = Field::Email;
        let errors = form.submit(today()).unwrap_err();
        assert_eq!(form.active, Field::Name);
        assert_eq!(form.field_error(Field::Name), Some("Name must be at least 2 characters"));
        assert!(form.field_error(Field::Gender).is_none());
        assert_eq!(errors.len(), 8);

        type_text(&mut form, "Jo");
        assert!(form.field_error(Field::Name).is_none());
        assert!(form.field_error(Field::Email).is_some());
    }

    #[test]
    fn test_filled_form_submits() {
        let mut form = StudentForm::new(today(), &catalog());
        type_text(&mut form, "Jo Park");
        form.active = Field::DateOfBirth;
        type_text(&mut form, "2003-07-09");
        form.active = Field::Street;
        type_text(&mut form, "5 Elm St");
        form.active = Field::City;
        type_text(&mut form, "Austin");
        form.active = Field::State;
        type_text(&mut form, "TX");
        form.active = Field::PostalCode;
        type_text(&mut form, "73301");
        form.active = Field::Phone;
        type_text(&mut form, "5125550101");
        form.active = Field::Email;
        type_text(&mut form, "jo@park.dev");

        let data = form.submit(today()).unwrap();
        assert_eq!(data.name, "Jo Park");
        assert_eq!(data.course_id, "c1");
        assert_eq!(data.contact_info.phone, "(512) 555-0101");
    }

    #[test]
    fn test_edit_form_round_trips_student() {
        let student = Student {
            id: StudentId::generate(),
            name: "Lee Chan".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(2001, 1, 2).unwrap(),
            year_of_admission: 2020,
            course_id: "c2".to_string(),
            address: crate::models::Address {
                street: "9 Pine".to_string(),
                city: "Reno".to_string(),
                state: "NV".to_string(),
                postal_code: "89501".to_string(),
            },
            contact_info: crate::models::ContactInfo {
                phone: "(775) 555-0100".to_string(),
                email: "lee@chan.io".to_string(),
            },
        };
        let mut form = StudentForm::from_student(&student, today());
        assert_eq!(form.display_value(Field::Course, &catalog()), "Art");
        assert_eq!(form.submit(today()).unwrap(), student.to_form_data());
    }
}
