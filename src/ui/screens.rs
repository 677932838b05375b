use crate::listing::{available_years, derive_page, ListPage, ListQuery, SortField};
use crate::models::{Student, StudentId};
use crate::store::CourseCatalog;

/// List-screen state: the search/filter/sort/page inputs plus the selected
/// row within the visible page. The page itself is re-derived from the store
/// whenever it is needed.
#[derive(Default)]
pub(crate) struct StudentListScreen {
    pub(crate) query: ListQuery,
    pub(crate) selected: usize,
}

impl StudentListScreen {
    pub(crate) fn page<'a>(&self, records: &'a [Student], catalog: &CourseCatalog) -> ListPage<'a> {
        derive_page(records, catalog, &self.query)
    }

    pub(crate) fn current_student<'a>(
        &self,
        records: &'a [Student],
        catalog: &CourseCatalog,
    ) -> Option<&'a Student> {
        self.page(records, catalog).items.get(self.selected).copied()
    }

    /// Replace the search term, ignoring surrounding whitespace. Any filter
    /// change starts over on page 1.
    pub(crate) fn set_search(&mut self, search: &str) {
        let search = search.trim();
        if self.query.search != search {
            self.query.search = search.to_string();
            self.reset_page();
        }
    }

    /// Step the year filter: all years, then each admission year present in
    /// the collection (newest first), then back to all.
    pub(crate) fn cycle_year(&mut self, records: &[Student]) -> Option<i32> {
        let years = available_years(records);
        self.query.year = next_option(&years, self.query.year.as_ref()).copied();
        self.reset_page();
        self.query.year
    }

    /// Step the course filter through the catalog in order.
    pub(crate) fn cycle_course(&mut self, catalog: &CourseCatalog) -> Option<String> {
        let ids: Vec<String> = catalog.courses().iter().map(|c| c.id.clone()).collect();
        self.query.course = next_option(&ids, self.query.course.as_ref()).cloned();
        self.reset_page();
        self.query.course.clone()
    }

    pub(crate) fn clear_filters(&mut self) {
        self.query.search.clear();
        self.query.year = None;
        self.query.course = None;
        self.reset_page();
    }

    pub(crate) fn toggle_sort(&mut self, field: SortField) {
        self.query.toggle_sort(field);
        self.selected = 0;
    }

    pub(crate) fn next_page(&mut self, total_pages: usize) {
        if self.query.page < total_pages {
            self.query.page += 1;
            self.selected = 0;
        }
    }

    pub(crate) fn previous_page(&mut self) {
        if self.query.page > 1 {
            self.query.page -= 1;
            self.selected = 0;
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize, page_len: usize) {
        if page_len == 0 {
            self.selected = 0;
            return;
        }
        let len = page_len as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    /// Select `id` if it is on the current page.
    pub(crate) fn focus(&mut self, id: StudentId, records: &[Student], catalog: &CourseCatalog) {
        let page = self.page(records, catalog);
        if let Some(idx) = page.items.iter().position(|student| student.id == id) {
            self.selected = idx;
        }
    }

    /// Pull the page and selection back in range after the collection
    /// shrank (e.g. the last student of the last page was deleted).
    pub(crate) fn ensure_in_bounds(&mut self, records: &[Student], catalog: &CourseCatalog) {
        let total_pages = self.page(records, catalog).total_pages;
        if self.query.page > total_pages {
            self.query.page = total_pages.max(1);
        }
        let page_len = self.page(records, catalog).items.len();
        if page_len == 0 {
            self.selected = 0;
        } else if self.selected >= page_len {
            self.selected = page_len - 1;
        }
    }

    fn reset_page(&mut self) {
        self.query.page = 1;
        self.selected = 0;
    }
}

/// Advance through `None → options[0] → … → options[n-1] → None`. A current
/// value that is no longer offered restarts from the first option.
fn next_option<'a, T: PartialEq>(options: &'a [T], current: Option<&T>) -> Option<&'a T> {
    match current {
        None => options.first(),
        Some(value) => match options.iter().position(|option| option == value) {
            Some(idx) => options.get(idx + 1),
            None => options.first(),
        },
    }
}
