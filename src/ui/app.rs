use std::mem;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::listing::{SortDirection, SortField};
use crate::models::{Student, StudentId};
use crate::store::{CourseCatalog, NoticeBoard, NoticeKind, StudentStore};
use crate::validation::Field;

use super::forms::{ConfirmStudentDelete, StudentForm, LABEL_WIDTH};
use super::helpers::{centered_rect, key_hints, labelled, section_title, surface_error};
use super::screens::StudentListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the title block above the student table.
const HEADER_HEIGHT: u16 = 4;

/// High-level navigation states.
enum Screen {
    Students,
    Details(StudentId),
}

/// Fine-grained modes layered on top of the current screen.
enum Mode {
    Normal,
    AddingStudent(StudentForm),
    EditingStudent { id: StudentId, form: StudentForm },
    ConfirmDelete(ConfirmStudentDelete),
    Searching(SearchState),
}

/// State for the inline search bar. Typing filters the list live; `committed`
/// is the search that was active when the bar opened.
struct SearchState {
    query: String,
    committed: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

impl From<NoticeKind> for StatusKind {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Success => StatusKind::Info,
            NoticeKind::Failure => StatusKind::Error,
        }
    }
}

/// Central application state. The store, catalog and notice board are handed
/// in by the caller; the app never reaches for global state.
pub struct App {
    store: StudentStore,
    catalog: CourseCatalog,
    /// Same queue the store reports to; drained into `status` after every
    /// store call.
    notices: NoticeBoard,
    list: StudentListScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    today: NaiveDate,
}

impl App {
    pub fn new(store: StudentStore, catalog: CourseCatalog, notices: NoticeBoard) -> Self {
        Self::with_today(store, catalog, notices, Local::now().date_naive())
    }

    /// Like [`App::new`] with a fixed "today", which bounds birth dates and
    /// admission years in the form.
    pub fn with_today(
        store: StudentStore,
        catalog: CourseCatalog,
        notices: NoticeBoard,
        today: NaiveDate,
    ) -> Self {
        Self {
            store,
            catalog,
            notices,
            list: StudentListScreen::default(),
            screen: Screen::Students,
            mode: Mode::Normal,
            status: None,
            today,
        }
    }

    pub fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Top-level key dispatcher. Every key goes through the active `Mode`,
    /// which returns the next mode. The boolean result tells the outer loop
    /// whether the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingStudent(form) => self.handle_add_student(code, form)?,
            Mode::EditingStudent { id, form } => self.handle_edit_student(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Students => self.handle_list_key(code, exit),
            Screen::Details(id) => self.handle_details_key(code, id, exit),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let page = self.list.page(self.store.students(), &self.catalog);
        let (page_len, total_pages) = (page.items.len(), page.total_pages);

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.list.move_selection(-1, page_len),
            KeyCode::Down => self.list.move_selection(1, page_len),
            KeyCode::Home => self.list.move_selection(-(page_len as isize), page_len),
            KeyCode::End => self.list.move_selection(page_len as isize, page_len),
            KeyCode::Left | KeyCode::PageUp => self.list.previous_page(),
            KeyCode::Right | KeyCode::PageDown => self.list.next_page(total_pages),
            KeyCode::Enter => match self.selected_student() {
                Some(student) => {
                    self.clear_status();
                    self.screen = Screen::Details(student.id);
                }
                None => self.set_status("No student selected.", StatusKind::Error),
            },
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Ok(Mode::AddingStudent(StudentForm::new(self.today, &self.catalog)));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => match self.selected_student() {
                Some(student) => {
                    self.clear_status();
                    return Ok(self.edit_mode(&student));
                }
                None => self.set_status("No student selected to edit.", StatusKind::Error),
            },
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                match self.selected_student() {
                    Some(student) => {
                        self.clear_status();
                        return Ok(Mode::ConfirmDelete(ConfirmStudentDelete::from(&student)));
                    }
                    None => self.set_status("No student selected to delete.", StatusKind::Error),
                }
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                return Ok(Mode::Searching(SearchState {
                    query: self.list.query.search.clone(),
                    committed: self.list.query.search.clone(),
                }));
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let message = match self.list.cycle_year(self.store.students()) {
                    Some(year) => format!("Showing students admitted in {year}."),
                    None => "Showing all years.".to_string(),
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let message = match self.list.cycle_course(&self.catalog) {
                    Some(course) => format!("Showing {}.", self.catalog.display_name(&course)),
                    None => "Showing all courses.".to_string(),
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.list.clear_filters();
                self.set_status("Search and filters cleared.", StatusKind::Info);
            }
            KeyCode::Char('1') => self.list.toggle_sort(SortField::Name),
            KeyCode::Char('2') => self.list.toggle_sort(SortField::Course),
            KeyCode::Char('3') => self.list.toggle_sort(SortField::YearOfAdmission),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_details_key(&mut self, code: KeyCode, id: StudentId, exit: &mut bool) -> Result<Mode> {
        let Some(student) = self.store.get(id).cloned() else {
            self.screen = Screen::Students;
            self.set_status("Student no longer exists.", StatusKind::Error);
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.clear_status();
                self.screen = Screen::Students;
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.clear_status();
                return Ok(self.edit_mode(&student));
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                self.clear_status();
                return Ok(Mode::ConfirmDelete(ConfirmStudentDelete::from(&student)));
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let email = student.contact_info.email.trim();
                if email.is_empty() {
                    self.set_status("This student has no email address.", StatusKind::Error);
                } else if let Err(err) = open_link(format!("mailto:{email}")) {
                    tracing::warn!(error = %err, "failed to open mail client");
                    self.set_status(format!("Failed to open mail client: {err}"), StatusKind::Error);
                } else {
                    self.set_status(format!("Composing email to {email}."), StatusKind::Info);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Enter => match self.save_new_student(&mut form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            other => self.edit_form(other, &mut form),
        }

        if keep_open {
            Ok(Mode::AddingStudent(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Mirror of `handle_add_student` for edits, keeping the student id so
    /// the store can replace the right record.
    fn handle_edit_student(&mut self, code: KeyCode, id: StudentId, mut form: StudentForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Enter => match self.save_existing_student(id, &mut form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            other => self.edit_form(other, &mut form),
        }

        if keep_open {
            Ok(Mode::EditingStudent { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Keys shared by the add and edit forms.
    fn edit_form(&mut self, code: KeyCode, form: &mut StudentForm) {
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => form.cycle(-1, &self.catalog),
            KeyCode::Right => form.cycle(1, &self.catalog),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(' ') if StudentForm::is_select(form.active) => {
                form.cycle(1, &self.catalog)
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
    }

    /// Confirmation dialog for deletion. Escape cancels, enter confirms.
    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmStudentDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        let page_len = self.list.page(self.store.students(), &self.catalog).items.len();
        match code {
            KeyCode::Esc => {
                self.list.set_search(&state.committed);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                self.list.set_search(&state.query);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                self.list.move_selection(-1, page_len);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.list.move_selection(1, page_len);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
            }
            _ => {}
        }

        self.list.set_search(&state.query);
        Ok(Mode::Searching(state))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Students => self.draw_student_list(frame, content_area),
            Screen::Details(id) => match self.store.get(id) {
                Some(student) => self.draw_details(frame, content_area, student),
                None => self.draw_student_list(frame, content_area),
            },
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, "Add New Student", form),
            Mode::EditingStudent { form, .. } => {
                self.draw_student_form(frame, area, "Edit Student", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_student_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let records = self.store.students();
        let page = self.list.page(records, &self.catalog);
        let query = &self.list.query;

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    "Student Management System",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  •  Total: {} students", records.len())),
            ]),
            self.filter_summary(),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Students"));
        frame.render_widget(header, chunks[0]);

        if page.items.is_empty() {
            let message = if records.is_empty() {
                "No students found. Press '+' to add one."
            } else {
                "No students match your search criteria."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, chunks[1]);
            return;
        }

        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let header_row = Row::new(vec![
            Cell::from(self.column_title("[1] Name", SortField::Name)),
            Cell::from(self.column_title("[2] Course", SortField::Course)),
            Cell::from(self.column_title("[3] Year", SortField::YearOfAdmission)),
            Cell::from("Email"),
        ])
        .style(header_style);

        let rows: Vec<Row> = page
            .items
            .iter()
            .enumerate()
            .map(|(idx, student)| {
                let row = Row::new(vec![
                    Cell::from(student.name.clone()),
                    Cell::from(self.catalog.display_name(&student.course_id).to_string()),
                    Cell::from(student.year_of_admission.to_string()),
                    Cell::from(student.contact_info.email.clone()),
                ]);
                if idx == self.list.selected {
                    row.style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(28),
                Constraint::Percentage(28),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header_row)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(table, chunks[1]);

        if page.total_pages > 1 {
            let pagination = Paragraph::new(format!(
                "‹ Page {} of {} ›  ({} matching)",
                query.page, page.total_pages, page.total_matches
            ))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
            frame.render_widget(pagination, chunks[2]);
        }
    }

    fn column_title(&self, title: &str, field: SortField) -> String {
        let query = &self.list.query;
        if query.sort_field == field {
            format!("{title} {}", query.sort_direction.arrow())
        } else {
            title.to_string()
        }
    }

    fn filter_summary(&self) -> Line<'static> {
        let query = &self.list.query;
        let active = Style::default().fg(Color::Yellow);
        let search = if query.search.is_empty() {
            Span::raw("Search: -")
        } else {
            Span::styled(format!("Search: \"{}\"", query.search), active)
        };
        let year = match query.year {
            Some(year) => Span::styled(format!("Year: {year}"), active),
            None => Span::raw("Year: All Years"),
        };
        let course = match &query.course {
            Some(course) => Span::styled(
                format!("Course: {}", self.catalog.display_name(course)),
                active,
            ),
            None => Span::raw("Course: All Courses"),
        };
        let direction = match query.sort_direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        };
        let mut spans = vec![
            search,
            Span::raw("   "),
            year,
            Span::raw("   "),
            course,
            Span::raw(format!(
                "   Sort: {} ({direction})",
                query.sort_field.label()
            )),
        ];
        if query.has_filters() {
            spans.push(Span::styled("   [x] clear", Style::default().fg(Color::Gray)));
        }
        Line::from(spans)
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, student: &Student) {
        let lines = vec![
            section_title("Personal Information"),
            labelled("Full Name", &student.name),
            labelled("Gender", student.gender.label()),
            labelled("Date of Birth", &student.display_birth_date()),
            Line::from(""),
            section_title("Academic Information"),
            labelled("Course", self.catalog.display_name(&student.course_id)),
            labelled("Year of Admission", &student.year_of_admission.to_string()),
            Line::from(""),
            section_title("Contact Information"),
            labelled("Email", &student.contact_info.email),
            labelled("Phone", &student.contact_info.phone),
            Line::from(""),
            section_title("Address"),
            labelled("Street", &student.address.street),
            labelled("City", &student.address.city),
            labelled("State", &student.address.state),
            labelled("Postal Code", &student.address.postal_code),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Student Details"),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search students");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::AddingStudent(_)) | (_, Mode::EditingStudent { .. }) => key_hints(&[
                ("[Tab/↑↓]", "Field"),
                ("[←→]", "Choose"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => {
                key_hints(&[("[y/Enter]", "Delete"), ("[n/Esc]", "Cancel")])
            }
            (_, Mode::Searching(_)) => key_hints(&[
                ("[type]", "Filter by name or email"),
                ("[↑↓]", "Select"),
                ("[Enter]", "Apply"),
                ("[Esc]", "Cancel"),
            ]),
            (Screen::Details(_), _) => key_hints(&[
                ("[e]", "Edit"),
                ("[-]", "Delete"),
                ("[m]", "Email"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ]),
            (Screen::Students, _) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[←→]", "Page"),
                ("[Enter]", "View"),
                ("[+]", "Add"),
                ("[e]", "Edit"),
                ("[-]", "Delete"),
                ("[f]", "Search"),
                ("[y/c]", "Year/Course"),
                ("[x]", "Clear"),
                ("[1-3]", "Sort"),
                ("[q]", "Quit"),
            ]),
        }
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = Vec::new();
        let mut cursor: Option<(u16, u16)> = None;
        for field in Field::ALL {
            if field == form.active && !StudentForm::is_select(field) {
                let x = inner.x + LABEL_WIDTH as u16 + form.value_len(field) as u16;
                cursor = Some((x, inner.y + lines.len() as u16));
            }
            lines.push(form.build_line(field, &self.catalog));
            if let Some(message) = form.field_error(field) {
                lines.push(Line::from(Span::styled(
                    format!("{:width$}{message}", "", width = LABEL_WIDTH),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • ←/→ to choose • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStudentDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {}?", confirm.name)),
            Line::from("Are you sure you want to delete this student? This action cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Move pending store notices into the footer; the newest one wins.
    fn pull_notices(&mut self) {
        if let Some(notice) = self.notices.drain().pop() {
            self.set_status(notice.message, notice.kind.into());
        }
    }

    fn selected_student(&self) -> Option<Student> {
        self.list
            .current_student(self.store.students(), &self.catalog)
            .cloned()
    }

    fn edit_mode(&self, student: &Student) -> Mode {
        Mode::EditingStudent {
            id: student.id,
            form: StudentForm::from_student(student, self.today),
        }
    }

    fn save_new_student(&mut self, form: &mut StudentForm) -> Result<StudentId> {
        let data = form.submit(self.today)?;
        let result = self.store.add(data);
        self.pull_notices();
        let student = result?;
        self.list.focus(student.id, self.store.students(), &self.catalog);
        Ok(student.id)
    }

    fn save_existing_student(&mut self, id: StudentId, form: &mut StudentForm) -> Result<()> {
        let data = form.submit(self.today)?;
        let result = self.store.update(id, data);
        self.pull_notices();
        if !result? {
            return Err(anyhow!("Student no longer exists."));
        }
        self.list.ensure_in_bounds(self.store.students(), &self.catalog);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmStudentDelete) -> Result<()> {
        let removed = self.store.delete(confirm.id);
        self.pull_notices();
        if !removed {
            return Err(anyhow!("{} was already removed.", confirm.name));
        }
        if matches!(self.screen, Screen::Details(id) if id == confirm.id) {
            self.screen = Screen::Students;
        }
        self.list.ensure_in_bounds(self.store.students(), &self.catalog);
        Ok(())
    }
}
