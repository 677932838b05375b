//! Derived view over the record collection: filter, then stable sort, then
//! paginate. Everything here is a pure function of its inputs, so the list
//! screen simply re-derives the page on every draw.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Student;
use crate::store::CourseCatalog;

/// Rows shown per page of the student table.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    YearOfAdmission,
    /// Sorts on the resolved course name, not the raw id.
    Course,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::YearOfAdmission => "Year of Admission",
            SortField::Course => "Course",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Search, filter, sort and pagination inputs of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Matched case-insensitively against name and email; empty matches all.
    pub search: String,
    pub year: Option<i32>,
    pub course: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            year: None,
            course: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Column-header behaviour: re-selecting the active field flips the
    /// direction, picking another field sorts it ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || self.year.is_some() || self.course.is_some()
    }

    /// Whether `student` passes the search, year and course predicates.
    pub fn matches(&self, student: &Student) -> bool {
        let needle = self.search.to_lowercase();
        let search_match = student.name.to_lowercase().contains(&needle)
            || student.contact_info.email.to_lowercase().contains(&needle);
        let year_match = self
            .year
            .map_or(true, |year| student.year_of_admission == year);
        let course_match = self
            .course
            .as_deref()
            .map_or(true, |course| student.course_id == course);

        search_match && year_match && course_match
    }
}

/// One rendered page of the list plus the metadata needed for pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<'a> {
    pub items: Vec<&'a Student>,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Filter, sort and slice `records` according to `query`. Pages past the end
/// (and page 0) yield no items; the caller decides whether to reset the page.
pub fn derive_page<'a>(
    records: &'a [Student],
    catalog: &CourseCatalog,
    query: &ListQuery,
) -> ListPage<'a> {
    let mut matches: Vec<&Student> = records
        .iter()
        .filter(|student| query.matches(student))
        .collect();

    // `sort_by` is stable, so equal keys keep their insertion order in both
    // directions.
    matches.sort_by(|a, b| {
        let ordering = compare_by(query.sort_field, catalog, a, b);
        match query.sort_direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let page_size = query.page_size.max(1);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size);

    let items = match query.page.checked_sub(1) {
        Some(page_index) => matches
            .into_iter()
            .skip(page_index.saturating_mul(page_size))
            .take(page_size)
            .collect(),
        None => Vec::new(),
    };

    ListPage {
        items,
        total_pages,
        total_matches,
    }
}

/// Distinct admission years present in `records`, newest first.
pub fn available_years(records: &[Student]) -> Vec<i32> {
    let years: BTreeSet<i32> = records
        .iter()
        .map(|student| student.year_of_admission)
        .collect();
    years.into_iter().rev().collect()
}

fn compare_by(field: SortField, catalog: &CourseCatalog, a: &Student, b: &Student) -> Ordering {
    match field {
        SortField::Name => locale_compare(&a.name, &b.name),
        SortField::YearOfAdmission => a.year_of_admission.cmp(&b.year_of_admission),
        SortField::Course => locale_compare(
            catalog.display_name(&a.course_id),
            catalog.display_name(&b.course_id),
        ),
    }
}

/// Human ordering for names and course titles, compared level by level:
/// base letters (accents and case ignored), then accents, then case with
/// lowercase first. "Émile" therefore sorts between "Edgar" and "Zoe".
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| compare_case(a, b))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn accented_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

fn compare_case(a: &str, b: &str) -> Ordering {
    for (left, right) in a.nfd().zip(b.nfd()) {
        match (left.is_lowercase(), right.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Address, ContactInfo, Course, Gender, StudentId};

    fn student(name: &str, email: &str, year: i32, course_id: &str) -> Student {
        Student {
            id: StudentId::generate(),
            name: name.to_string(),
            gender: Gender::PreferNotToSay,
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            year_of_admission: year,
            course_id: course_id.to_string(),
            address: Address::default(),
            contact_info: ContactInfo {
                phone: "(555) 000-0000".to_string(),
                email: email.to_string(),
            },
        }
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(vec![
            Course::new("c1", "Physics"),
            Course::new("c2", "Art"),
            Course::new("c3", "Zoology"),
        ])
    }

    fn names<'a>(page: &ListPage<'a>) -> Vec<&'a str> {
        page.items.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_six_records_span_two_pages() {
        let records: Vec<_> = ["Ann", "Ben", "Cal", "Dee", "Eve", "Fay"]
            .iter()
            .map(|name| student(name, "x@example.com", 2022, "c1"))
            .collect();
        let mut query = ListQuery::default();

        let first = derive_page(&records, &catalog(), &query);
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_matches, 6);

        query.page = 2;
        let second = derive_page(&records, &catalog(), &query);
        assert_eq!(names(&second), ["Fay"]);
        assert_eq!(second.total_pages, 2);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let records = vec![student("Ann", "a@example.com", 2022, "c1")];
        let mut query = ListQuery::default();
        query.page = 3;
        assert!(derive_page(&records, &catalog(), &query).items.is_empty());
        query.page = 0;
        let page = derive_page(&records, &catalog(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let page = derive_page(&[], &catalog(), &ListQuery::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_sizes_bound_every_page() {
        let records: Vec<_> = (0..23)
            .map(|n| student(&format!("S{n:02}"), "s@example.com", 2020, "c1"))
            .collect();
        let mut query = ListQuery::default();
        let total_pages = derive_page(&records, &catalog(), &query).total_pages;
        assert_eq!(total_pages, 5);
        for page in 1..=total_pages {
            query.page = page;
            let len = derive_page(&records, &catalog(), &query).items.len();
            if page < total_pages {
                assert_eq!(len, PAGE_SIZE);
            } else {
                assert!(len <= PAGE_SIZE && len > 0);
            }
        }
    }

    #[test]
    fn test_course_filter_keeps_matching_records() {
        let records = vec![
            student("Ann", "a@example.com", 2022, "c1"),
            student("Ben", "b@example.com", 2022, "c2"),
            student("Cal", "c@example.com", 2021, "c1"),
        ];
        let query = ListQuery {
            course: Some("c1".to_string()),
            ..ListQuery::default()
        };
        let page = derive_page(&records, &catalog(), &query);
        assert_eq!(names(&page), ["Ann", "Cal"]);
    }

    #[test]
    fn test_search_matches_name_or_email_case_insensitively() {
        let records = vec![
            student("Maria Lopez", "mlopez@uni.edu", 2022, "c1"),
            student("John Smith", "MARIA.fan@mail.com", 2022, "c1"),
            student("Kim Lee", "kim@uni.edu", 2022, "c1"),
        ];
        let query = ListQuery {
            search: "maria".to_string(),
            ..ListQuery::default()
        };
        let page = derive_page(&records, &catalog(), &query);
        assert_eq!(names(&page), ["John Smith", "Maria Lopez"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = vec![
            student("Ann", "ann@example.com", 2022, "c1"),
            student("Anna", "anna@example.com", 2021, "c1"),
            student("Annie", "annie@example.com", 2022, "c2"),
            student("Bob", "bob@example.com", 2022, "c1"),
        ];
        let query = ListQuery {
            search: "ann".to_string(),
            year: Some(2022),
            course: Some("c1".to_string()),
            ..ListQuery::default()
        };
        for record in &records {
            let expected = record.name == "Ann";
            assert_eq!(query.matches(record), expected, "{}", record.name);
        }
        assert_eq!(names(&derive_page(&records, &catalog(), &query)), ["Ann"]);
    }

    #[test]
    fn test_year_sort_is_stable_and_reversible() {
        let records = vec![
            student("A", "a@x.io", 2021, "c1"),
            student("B", "b@x.io", 2019, "c1"),
            student("C", "c@x.io", 2021, "c1"),
            student("D", "d@x.io", 2023, "c1"),
        ];
        let mut query = ListQuery::default();
        query.toggle_sort(SortField::YearOfAdmission);
        assert_eq!(names(&derive_page(&records, &catalog(), &query)), ["B", "A", "C", "D"]);

        query.toggle_sort(SortField::YearOfAdmission);
        assert_eq!(query.sort_direction, SortDirection::Descending);
        // Ties keep their original relative order in both directions.
        assert_eq!(names(&derive_page(&records, &catalog(), &query)), ["D", "A", "C", "B"]);
    }

    #[test]
    fn test_reversal_of_tie_free_input() {
        let records = vec![
            student("A", "a@x.io", 2020, "c1"),
            student("B", "b@x.io", 2018, "c1"),
            student("C", "c@x.io", 2022, "c1"),
        ];
        let mut query = ListQuery {
            sort_field: SortField::YearOfAdmission,
            ..ListQuery::default()
        };
        let ascending = names(&derive_page(&records, &catalog(), &query));
        query.sort_direction = SortDirection::Descending;
        let mut descending = names(&derive_page(&records, &catalog(), &query));
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_course_sort_uses_resolved_names() {
        let records = vec![
            student("Phys", "p@x.io", 2020, "c1"),
            student("Lost", "l@x.io", 2020, "zz"),
            student("Zoo", "z@x.io", 2020, "c3"),
            student("Art", "a@x.io", 2020, "c2"),
        ];
        let query = ListQuery {
            sort_field: SortField::Course,
            ..ListQuery::default()
        };
        // Art < Physics < Unknown Course < Zoology
        assert_eq!(
            names(&derive_page(&records, &catalog(), &query)),
            ["Art", "Phys", "Lost", "Zoo"]
        );
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let records = vec![
            student("bob", "b@x.io", 2020, "c1"),
            student("Alice", "a@x.io", 2020, "c1"),
            student("Carl", "c@x.io", 2020, "c1"),
        ];
        let page = derive_page(&records, &catalog(), &ListQuery::default());
        assert_eq!(names(&page), ["Alice", "bob", "Carl"]);
    }

    #[test]
    fn test_locale_compare_orders_lowercase_first_on_ties() {
        assert_eq!(locale_compare("anna", "Anna"), Ordering::Less);
        assert_eq!(locale_compare("Anna", "anna"), Ordering::Greater);
        assert_eq!(locale_compare("Anna", "Anna"), Ordering::Equal);
        assert_eq!(locale_compare("Ann", "anna"), Ordering::Less);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letters() {
        let mut names = ["Zoe", "Émile", "Edgar", "Ángel", "Bruno"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(names, ["Ángel", "Bruno", "Edgar", "Émile", "Zoe"]);

        assert_eq!(locale_compare("Elise", "Élise"), Ordering::Less);
        assert_eq!(locale_compare("élan", "Elan"), Ordering::Greater);
        // Precomposed and decomposed spellings are the same name.
        assert_eq!(locale_compare("Ren\u{e9}", "Rene\u{301}"), Ordering::Equal);
    }

    #[test]
    fn test_name_sort_places_accented_records_in_order() {
        let records = vec![
            student("Zoe", "z@x.io", 2022, "c1"),
            student("Ángel", "a@x.io", 2022, "c1"),
            student("Óscar", "o@x.io", 2022, "c1"),
            student("Nadia", "n@x.io", 2022, "c1"),
        ];
        let catalog = CourseCatalog::new(vec![Course::new("c1", "Physics")]);
        let page = derive_page(&records, &catalog, &ListQuery::default());
        let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ángel", "Nadia", "Óscar", "Zoe"]);
    }

    #[test]
    fn test_toggle_sort_switches_field_ascending() {
        let mut query = ListQuery::default();
        query.toggle_sort(SortField::Name);
        assert_eq!(query.sort_direction, SortDirection::Descending);
        query.toggle_sort(SortField::Course);
        assert_eq!(query.sort_field, SortField::Course);
        assert_eq!(query.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn test_available_years_are_distinct_and_descending() {
        let records = vec![
            student("A", "a@x.io", 2021, "c1"),
            student("B", "b@x.io", 2024, "c1"),
            student("C", "c@x.io", 2021, "c1"),
            student("D", "d@x.io", 2019, "c1"),
        ];
        assert_eq!(available_years(&records), [2024, 2021, 2019]);
        assert!(available_years(&[]).is_empty());
    }
}
