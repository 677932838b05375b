use chrono::NaiveDate;
use student_records::listing::{available_years, derive_page, ListQuery, SortDirection, SortField};
use student_records::models::{Address, ContactInfo, Gender};
use student_records::store::{LogSink, NoticeKind, StoreError, UNKNOWN_COURSE};
use student_records::validation::{validate, StudentDraft};
use student_records::{CourseCatalog, NoticeBoard, StudentFormData, StudentStore};

fn form(name: &str, course: &str, year: i32) -> StudentFormData {
    StudentFormData {
        name: name.to_string(),
        gender: Gender::Other,
        date_of_birth: "2003-05-20".to_string(),
        year_of_admission: year,
        course_id: course.to_string(),
        address: Address {
            street: "12 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
        },
        contact_info: ContactInfo {
            phone: "(217) 555-0143".to_string(),
            email: format!("{}@college.edu", name.to_lowercase()),
        },
    }
}

#[test]
fn test_added_student_is_retrievable() {
    let mut store = StudentStore::new(LogSink);
    let alice = store.add(form("Alice", "c1", 2023)).unwrap();

    assert_eq!(store.len(), 1);
    let found = store.get(alice.id).unwrap();
    assert_eq!(found.name, "Alice");
    assert_eq!(found.course_id, "c1");
    assert_eq!(found.year_of_admission, 2023);
}

#[test]
fn test_six_records_span_two_pages() {
    let mut store = StudentStore::new(LogSink);
    for name in ["Fay", "Eve", "Dan", "Cal", "Bea", "Abe"] {
        store.add(form(name, "c1", 2022)).unwrap();
    }
    let catalog = CourseCatalog::default();

    let mut query = ListQuery::default();
    let first = derive_page(store.students(), &catalog, &query);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].name, "Abe");

    query.page = 2;
    let second = derive_page(store.students(), &catalog, &query);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "Fay");

    query.page = 3;
    assert!(derive_page(store.students(), &catalog, &query).items.is_empty());
}

#[test]
fn test_course_filter_keeps_only_matching_records() {
    let mut store = StudentStore::new(LogSink);
    store.add(form("Ada", "c1", 2021)).unwrap();
    store.add(form("Ben", "c2", 2022)).unwrap();
    store.add(form("Cyd", "c1", 2023)).unwrap();

    let query = ListQuery {
        course: Some("c1".to_string()),
        ..ListQuery::default()
    };
    let page = derive_page(store.students(), &CourseCatalog::default(), &query);
    let mut names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["Ada", "Cyd"]);
    assert_eq!(page.total_matches, 2);
    assert_eq!(available_years(store.students()), [2023, 2022, 2021]);
}

#[test]
fn test_validated_form_flows_into_store_and_listing() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let draft = StudentDraft {
        name: "  Grace Hopper ".to_string(),
        gender: Some(Gender::Female),
        date_of_birth: "2005-12-09".to_string(),
        year_of_admission: "2024".to_string(),
        course_id: "c9".to_string(),
        street: "1 Navy Way".to_string(),
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        postal_code: "22202".to_string(),
        phone: "(703) 555-0199".to_string(),
        email: "grace@navy.mil".to_string(),
    };
    let data = validate(&draft, today).unwrap();

    let board = NoticeBoard::new();
    let mut store = StudentStore::new(board.clone());
    let grace = store.add(data).unwrap();
    assert_eq!(grace.name, "Grace Hopper");

    let notices = board.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);

    let catalog = CourseCatalog::default();
    assert_eq!(catalog.display_name(&grace.course_id), UNKNOWN_COURSE);

    let query = ListQuery {
        search: "NAVY".to_string(),
        sort_field: SortField::Course,
        sort_direction: SortDirection::Descending,
        ..ListQuery::default()
    };
    let page = derive_page(store.students(), &catalog, &query);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, grace.id);
}

#[test]
fn test_failed_operations_leave_store_untouched() {
    let board = NoticeBoard::new();
    let mut store = StudentStore::new(board.clone());
    let ada = store.add(form("Ada", "c1", 2021)).unwrap();
    board.drain();

    let mut broken = form("Ada", "c1", 2021);
    broken.date_of_birth = "not-a-date".to_string();
    assert!(matches!(
        store.add(broken.clone()),
        Err(StoreError::InvalidDateOfBirth(_))
    ));
    assert!(store.update(ada.id, broken).is_err());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(ada.id), Some(&ada));

    let kinds: Vec<_> = board.drain().into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, [NoticeKind::Failure, NoticeKind::Failure]);

    assert!(store.delete(ada.id));
    assert!(!store.delete(ada.id));
    assert!(store.get(ada.id).is_none());
}
