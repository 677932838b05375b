use crate::models::Course;

/// Label shown (and sorted on) when a student's course id is not in the
/// catalog.
pub const UNKNOWN_COURSE: &str = "Unknown Course";

/// Read-only, ordered list of courses supplied by the hosting application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    /// Course name for `id`, falling back to [`UNKNOWN_COURSE`].
    pub fn display_name(&self, id: &str) -> &str {
        self.get(id)
            .map(|course| course.name.as_str())
            .unwrap_or(UNKNOWN_COURSE)
    }

    /// Position of `id` within the catalog, used by select widgets.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.courses.iter().position(|course| course.id == id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl Default for CourseCatalog {
    /// Built-in catalog used when the configuration does not list courses.
    fn default() -> Self {
        Self::new(vec![
            Course::new("c1", "Computer Science"),
            Course::new("c2", "Electrical Engineering"),
            Course::new("c3", "Mechanical Engineering"),
            Course::new("c4", "Business Administration"),
            Course::new("c5", "Psychology"),
            Course::new("c6", "Biology"),
            Course::new("c7", "Mathematics"),
            Course::new("c8", "English Literature"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_unknown() {
        let catalog = CourseCatalog::new(vec![Course::new("c1", "Physics")]);
        assert_eq!(catalog.display_name("c1"), "Physics");
        assert_eq!(catalog.display_name("missing"), UNKNOWN_COURSE);
        assert_eq!(catalog.position("c1"), Some(0));
        assert_eq!(catalog.position("missing"), None);
    }

    #[test]
    fn test_default_catalog_is_populated() {
        let catalog = CourseCatalog::default();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.courses()[0].id, "c1");
    }
}
