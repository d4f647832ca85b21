//! Sortable, selectable data table component
//!
//! State lives in [`TableState`] and changes only through
//! [`TableState::apply`], one [`TableEvent`] at a time. [`DataTable`] wraps
//! that state with the caller's props, the selection notifier, terminal input
//! mapping and rendering.

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    models::{sorted_records, Column, Record, SortDirection, SortState},
    ui::{contains, Styles},
};

const SEPARATOR: &str = " | ";
const CHECKBOX_WIDTH: usize = 3;

/// Called with the full selection after every change
pub type SelectionNotifier = Box<dyn FnMut(&[Rc<Record>])>;

/// Caller-supplied inputs of a table
#[derive(Debug, Clone, Default)]
pub struct DataTableProps {
    pub records: Vec<Rc<Record>>,
    pub columns: Vec<Column>,
    pub loading: bool,
    pub selectable: bool,
}

impl DataTableProps {
    pub fn new(records: Vec<Rc<Record>>, columns: Vec<Column>) -> Self {
        Self {
            records,
            columns,
            ..Default::default()
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }
}

/// Configuration for table display
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    pub title: String,
    pub show_borders: bool,
    pub max_column_width: usize,
    pub loading_text: String,
    pub empty_text: String,
}

impl Default for DataTableConfig {
    fn default() -> Self {
        Self {
            title: "Table".to_string(),
            show_borders: true,
            max_column_width: 24,
            loading_text: "Loading...".to_string(),
            empty_text: "No data available".to_string(),
        }
    }
}

impl DataTableConfig {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width.max(1);
        self
    }

    pub fn without_borders(mut self) -> Self {
        self.show_borders = false;
        self
    }
}

/// Discrete user interactions a table reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// Header of the column with this field key was clicked
    HeaderClicked(String),
    /// Row at this position of the displayed (sorted) order was clicked
    RowClicked(usize),
}

/// What an applied event changed
#[derive(Debug, Clone, PartialEq)]
pub enum TableOutcome {
    SortChanged(SortState),
    SelectionChanged(Vec<Rc<Record>>),
}

/// What the table shows for the current props and state
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Loading,
    Empty,
    Rows(Vec<Rc<Record>>),
}

/// Screen regions from the last render, used for mouse hit testing
#[derive(Debug, Clone, Default)]
struct HitRegions {
    header: Rect,
    /// (field key, start x, width)
    columns: Vec<(String, u16, u16)>,
    rows: Rect,
    offset: usize,
}

/// Per-instance table state: sort, selection and cursors
#[derive(Debug, Default)]
pub struct TableState {
    sort: Option<SortState>,
    selection: Vec<Rc<Record>>,
    cursor: usize,
    header_cursor: usize,
    list_state: ListState,
    hit: HitRegions,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Selected records in the order they were selected
    pub fn selection(&self) -> &[Rc<Record>] {
        &self.selection
    }

    pub fn is_selected(&self, record: &Rc<Record>) -> bool {
        self.selection.iter().any(|r| Rc::ptr_eq(r, record))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Derive what to display. Loading short-circuits before any sorting.
    pub fn view(&self, props: &DataTableProps) -> TableView {
        if props.loading {
            TableView::Loading
        } else if props.records.is_empty() {
            TableView::Empty
        } else {
            TableView::Rows(sorted_records(&props.records, self.sort.as_ref()))
        }
    }

    /// Apply one event. Returns `None` when nothing changed.
    pub fn apply(&mut self, event: &TableEvent, props: &DataTableProps) -> Option<TableOutcome> {
        if props.loading {
            return None;
        }

        match event {
            TableEvent::HeaderClicked(key) => self.click_header(key, props),
            TableEvent::RowClicked(index) => {
                if !props.selectable {
                    return None;
                }
                let record = match self.view(props) {
                    TableView::Rows(rows) => rows.get(*index).cloned()?,
                    _ => return None,
                };
                self.toggle(&record);
                Some(TableOutcome::SelectionChanged(self.selection.clone()))
            }
        }
    }

    fn click_header(&mut self, key: &str, props: &DataTableProps) -> Option<TableOutcome> {
        if !props.has_column(key) {
            return None;
        }

        let next = match &self.sort {
            Some(current) if current.key == key && current.direction == SortDirection::Ascending => {
                SortState::descending(key)
            }
            _ => SortState::ascending(key),
        };

        debug!("Sorting by '{}' ({})", next.key, next.direction.as_str());
        self.sort = Some(next.clone());
        Some(TableOutcome::SortChanged(next))
    }

    fn toggle(&mut self, record: &Rc<Record>) {
        if let Some(pos) = self.selection.iter().position(|r| Rc::ptr_eq(r, record)) {
            self.selection.remove(pos);
            debug!("Row deselected, {} selected", self.selection.len());
        } else {
            self.selection.push(Rc::clone(record));
            debug!("Row selected, {} selected", self.selection.len());
        }
    }

    /// Drop selected records that are no longer in `records`. Returns true if any were dropped.
    fn retain_records(&mut self, records: &[Rc<Record>]) -> bool {
        let before = self.selection.len();
        self.selection
            .retain(|selected| records.iter().any(|r| Rc::ptr_eq(r, selected)));
        self.cursor = self.cursor.min(records.len().saturating_sub(1));
        self.selection.len() != before
    }

    /// Forget the sort if its column went away
    fn retain_columns(&mut self, columns: &[Column]) {
        if let Some(sort) = &self.sort {
            if !columns.iter().any(|c| c.key == sort.key) {
                debug!("Sort column '{}' removed, clearing sort", sort.key);
                self.sort = None;
            }
        }
        self.header_cursor = self.header_cursor.min(columns.len().saturating_sub(1));
    }

    fn move_cursor(&mut self, row_count: usize, down: bool) {
        if row_count == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % row_count
        } else if self.cursor == 0 {
            row_count - 1
        } else {
            self.cursor - 1
        };
    }
}

/// Table component: props, state and the optional selection notifier
pub struct DataTable {
    props: DataTableProps,
    state: TableState,
    config: DataTableConfig,
    on_selection_change: Option<SelectionNotifier>,
    focused: bool,
}

impl DataTable {
    pub fn new(props: DataTableProps) -> Self {
        Self {
            props,
            state: TableState::new(),
            config: DataTableConfig::default(),
            on_selection_change: None,
            focused: false,
        }
    }

    pub fn with_config(mut self, config: DataTableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_selection_change(mut self, notifier: impl FnMut(&[Rc<Record>]) + 'static) -> Self {
        self.on_selection_change = Some(Box::new(notifier));
        self
    }

    /// Start out sorted. Ignored when the key is not one of the columns.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        if self.props.has_column(&sort.key) {
            self.state.sort = Some(sort);
        }
        self
    }

    pub fn props(&self) -> &DataTableProps {
        &self.props
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn view(&self) -> TableView {
        self.state.view(&self.props)
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.props.loading = loading;
    }

    /// Replace the records. Selected records missing from the new set are
    /// dropped and the notifier hears about it.
    pub fn set_records(&mut self, records: Vec<Rc<Record>>) {
        self.props.records = records;
        if self.state.retain_records(&self.props.records) {
            self.notify();
        }
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.props.columns = columns;
        self.state.retain_columns(&self.props.columns);
    }

    /// Apply an event and notify on selection changes
    pub fn handle(&mut self, event: TableEvent) -> Option<TableOutcome> {
        let outcome = self.state.apply(&event, &self.props);
        if matches!(outcome, Some(TableOutcome::SelectionChanged(_))) {
            self.notify();
        }
        outcome
    }

    fn notify(&mut self) {
        if let Some(notifier) = self.on_selection_change.as_mut() {
            notifier(&self.state.selection);
        }
    }

    fn row_count(&self) -> usize {
        if self.props.loading {
            0
        } else {
            self.props.records.len()
        }
    }

    /// Handle keyboard input. Returns true if the key was used.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let rows = self.row_count();
        match key.code {
            KeyCode::Up => self.state.move_cursor(rows, false),
            KeyCode::Down => self.state.move_cursor(rows, true),
            KeyCode::Home => self.state.cursor = 0,
            KeyCode::End => self.state.cursor = rows.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.handle(TableEvent::RowClicked(self.state.cursor));
            }
            KeyCode::Left => {
                self.state.header_cursor = self.state.header_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let last = self.props.columns.len().saturating_sub(1);
                self.state.header_cursor = (self.state.header_cursor + 1).min(last);
            }
            KeyCode::Char('s') => {
                if let Some(column) = self.props.columns.get(self.state.header_cursor) {
                    let key = column.key.clone();
                    self.handle(TableEvent::HeaderClicked(key));
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                match self.props.columns.get(index) {
                    Some(column) => {
                        self.state.header_cursor = index;
                        let key = column.key.clone();
                        self.handle(TableEvent::HeaderClicked(key));
                    }
                    None => return false,
                }
            }
            _ => return false,
        }
        true
    }

    /// Translate a mouse event using the regions of the last render
    pub fn event_at(&self, column: u16, row: u16) -> Option<TableEvent> {
        let hit = &self.state.hit;

        if contains(hit.header, column, row) {
            return hit
                .columns
                .iter()
                .find(|(_, x, width)| column >= *x && column < x + width)
                .map(|(key, _, _)| TableEvent::HeaderClicked(key.clone()));
        }

        if contains(hit.rows, column, row) {
            let index = hit.offset + (row - hit.rows.y) as usize;
            if index < self.row_count() {
                return Some(TableEvent::RowClicked(index));
            }
        }

        None
    }

    /// Handle mouse input. Returns true if the event was used.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match self.event_at(mouse.column, mouse.row) {
                Some(event) => {
                    if let TableEvent::RowClicked(index) = &event {
                        self.state.cursor = *index;
                    }
                    self.handle(event);
                    true
                }
                None => false,
            },
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if !contains(self.state.hit.rows, mouse.column, mouse.row) {
                    return false;
                }
                let down = mouse.kind == MouseEventKind::ScrollDown;
                self.state.move_cursor(self.row_count(), down);
                true
            }
            _ => false,
        }
    }

    /// Width of each column: widest of header (plus sort glyph) and cells, capped.
    fn column_widths(&self, rows: &[Rc<Record>]) -> Vec<usize> {
        self.props
            .columns
            .iter()
            .map(|column| {
                let header = column.header.width() + 2;
                let widest = rows
                    .iter()
                    .map(|r| r.cell_text(&column.key).width())
                    .max()
                    .unwrap_or(0);
                header.max(widest).min(self.config.max_column_width).max(1)
            })
            .collect()
    }

    fn header_label(&self, column: &Column) -> String {
        match &self.state.sort {
            Some(sort) if sort.key == column.key => {
                format!("{} {}", column.header, sort.direction.indicator())
            }
            _ => column.header.clone(),
        }
    }

    fn block(&self, title: String) -> Block<'static> {
        if self.config.show_borders {
            let border = if self.focused {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            };
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border)
        } else {
            Block::default()
        }
    }

    /// Render the table
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let rows = match self.view() {
            TableView::Loading => {
                self.render_placeholder(f, area, self.config.loading_text.clone(), Styles::info());
                return;
            }
            TableView::Empty => {
                self.render_placeholder(f, area, self.config.empty_text.clone(), Styles::inactive());
                return;
            }
            TableView::Rows(rows) => rows,
        };

        let title = if self.props.selectable {
            format!(
                "{} ({} rows, {} selected)",
                self.config.title,
                rows.len(),
                self.state.selection.len()
            )
        } else {
            format!("{} ({} rows)", self.config.title, rows.len())
        };

        let block = self.block(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            self.state.hit = HitRegions::default();
            return;
        }

        let widths = self.column_widths(&rows);
        let header_area = Rect { height: 1, ..inner };
        let rows_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };

        // Header line and column hit regions
        let mut spans = Vec::new();
        let mut columns = Vec::new();
        let mut x = inner.x as usize;
        if self.props.selectable {
            spans.push(Span::raw(fit_cell("", CHECKBOX_WIDTH)));
            spans.push(Span::raw(SEPARATOR));
            x += CHECKBOX_WIDTH + SEPARATOR.len();
        }
        for (i, (column, width)) in self.props.columns.iter().zip(&widths).enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, Styles::title()));
                x += SEPARATOR.len();
            }
            let active = self.state.sort.as_ref().is_some_and(|s| s.key == column.key);
            let mut style = Styles::table_header(active);
            if self.focused && i == self.state.header_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(fit_cell(&self.header_label(column), *width), style));
            columns.push((column.key.clone(), clamp_u16(x), clamp_u16(*width)));
            x += width;
        }
        f.render_widget(Paragraph::new(Line::from(spans)), header_area);

        // Data rows
        let items: Vec<ListItem> = rows
            .iter()
            .map(|record| {
                let checked = self.state.is_selected(record);
                let style = if checked { Styles::checked_row() } else { Style::default() };
                let mut spans = Vec::new();
                if self.props.selectable {
                    let mark = if checked { "[x]" } else { "[ ]" };
                    spans.push(Span::styled(mark, style));
                    spans.push(Span::styled(SEPARATOR, style));
                }
                for (i, (column, width)) in self.props.columns.iter().zip(&widths).enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(SEPARATOR, style));
                    }
                    spans.push(Span::styled(fit_cell(&record.cell_text(&column.key), *width), style));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        self.state.cursor = self.state.cursor.min(rows.len().saturating_sub(1));
        self.state
            .list_state
            .select(if self.focused { Some(self.state.cursor) } else { None });

        let list = List::new(items).highlight_style(Styles::cursor_row());
        f.render_stateful_widget(list, rows_area, &mut self.state.list_state);

        self.state.hit = HitRegions {
            header: header_area,
            columns,
            rows: rows_area,
            offset: self.state.list_state.offset(),
        };
    }

    fn render_placeholder(&mut self, f: &mut Frame, area: Rect, text: String, style: Style) {
        self.state.hit = HitRegions::default();
        let paragraph = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(self.block(self.config.title.clone()));
        f.render_widget(paragraph, area);
    }

    /// Render the current view as plain text, one line per row
    pub fn to_plain_text(&self) -> String {
        let rows = match self.view() {
            TableView::Loading => return self.config.loading_text.clone(),
            TableView::Empty => return self.config.empty_text.clone(),
            TableView::Rows(rows) => rows,
        };

        let widths = self.column_widths(&rows);
        let mut lines = Vec::with_capacity(rows.len() + 2);

        let header = self
            .props
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| fit_cell(&self.header_label(column), *width))
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(header.trim_end().to_string());

        let total: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * widths.len().saturating_sub(1);
        lines.push("-".repeat(total));

        for record in &rows {
            let line = self
                .props
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| fit_cell(&record.cell_text(&column.key), *width))
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Truncate to `width` display columns (ellipsis when cut) and pad with spaces.
fn fit_cell(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if text.width() <= width {
        out.push_str(text);
        used = text.width();
    } else {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(c);
            used += w;
        }
        if width > 0 {
            out.push('…');
            used += 1;
        }
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::cell::RefCell;

    fn record(value: serde_json::Value) -> Rc<Record> {
        Rc::new(Record::from_value(value, 0).unwrap())
    }

    fn numbers() -> Vec<Rc<Record>> {
        vec![
            record(json!({"n": 3, "name": "c"})),
            record(json!({"n": 1, "name": "a"})),
            record(json!({"n": 2, "name": "b"})),
        ]
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("n", "N"), Column::new("name", "Name")]
    }

    fn rows(view: TableView) -> Vec<Rc<Record>> {
        match view {
            TableView::Rows(rows) => rows,
            other => panic!("expected rows, got {:?}", other),
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_header_click_cycles_direction() {
        let props = DataTableProps::new(numbers(), columns());
        let mut state = TableState::new();

        let outcome = state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        assert_eq!(outcome, Some(TableOutcome::SortChanged(SortState::ascending("n"))));
        let asc: Vec<_> = rows(state.view(&props)).iter().map(|r| r.cell_text("n")).collect();
        assert_eq!(asc, vec!["1", "2", "3"]);

        state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        assert_eq!(state.sort(), Some(&SortState::descending("n")));
        let desc: Vec<_> = rows(state.view(&props)).iter().map(|r| r.cell_text("n")).collect();
        assert_eq!(desc, vec!["3", "2", "1"]);

        // Descending on the same key goes back to ascending
        state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        assert_eq!(state.sort(), Some(&SortState::ascending("n")));

        // A different key always starts ascending
        state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        state.apply(&TableEvent::HeaderClicked("name".into()), &props);
        assert_eq!(state.sort(), Some(&SortState::ascending("name")));
    }

    #[test]
    fn test_header_click_unknown_key_ignored() {
        let props = DataTableProps::new(numbers(), columns());
        let mut state = TableState::new();
        assert_eq!(state.apply(&TableEvent::HeaderClicked("nope".into()), &props), None);
        assert!(state.sort().is_none());
    }

    #[test]
    fn test_sorting_does_not_touch_props() {
        let props = DataTableProps::new(numbers(), columns());
        let original = props.records.clone();
        let mut state = TableState::new();
        state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        let _ = state.view(&props);
        assert!(props.records.iter().zip(&original).all(|(a, b)| Rc::ptr_eq(a, b)));
    }

    #[test]
    fn test_row_toggle_twice_restores_selection() {
        let props = DataTableProps::new(numbers(), columns()).selectable(true);
        let mut state = TableState::new();

        let outcome = state.apply(&TableEvent::RowClicked(1), &props);
        match outcome {
            Some(TableOutcome::SelectionChanged(selected)) => {
                assert_eq!(selected.len(), 1);
                assert!(Rc::ptr_eq(&selected[0], &props.records[1]));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        state.apply(&TableEvent::RowClicked(1), &props);
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_row_click_uses_displayed_order() {
        let props = DataTableProps::new(numbers(), columns()).selectable(true);
        let mut state = TableState::new();
        state.apply(&TableEvent::HeaderClicked("n".into()), &props);
        state.apply(&TableEvent::RowClicked(0), &props);
        // First displayed row ascending by n is the record with n = 1
        assert!(Rc::ptr_eq(&state.selection()[0], &props.records[1]));
    }

    #[test]
    fn test_identical_content_distinct_references() {
        let twins = vec![record(json!({"n": 1})), record(json!({"n": 1}))];
        let props = DataTableProps::new(twins, columns()).selectable(true);
        let mut state = TableState::new();
        state.apply(&TableEvent::RowClicked(0), &props);
        assert!(state.is_selected(&props.records[0]));
        assert!(!state.is_selected(&props.records[1]));
    }

    #[test]
    fn test_not_selectable_never_notifies() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()))
            .on_selection_change(move |_| *counter.borrow_mut() += 1);

        for i in 0..3 {
            assert_eq!(table.handle(TableEvent::RowClicked(i)), None);
        }
        assert!(table.state().selection().is_empty());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_notifier_receives_snapshot() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()).selectable(true))
            .on_selection_change(move |selected| sink.borrow_mut().push(selected.len()));

        table.handle(TableEvent::RowClicked(0));
        table.handle(TableEvent::RowClicked(2));
        table.handle(TableEvent::RowClicked(0));
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let props = DataTableProps::new(numbers(), columns()).selectable(true);
        let mut state = TableState::new();
        assert_eq!(state.apply(&TableEvent::RowClicked(10), &props), None);
    }

    #[test]
    fn test_loading_and_empty_views() {
        let loading = DataTableProps::new(numbers(), columns()).loading(true).selectable(true);
        let mut state = TableState::new();
        assert_eq!(state.view(&loading), TableView::Loading);
        assert_eq!(state.apply(&TableEvent::RowClicked(0), &loading), None);

        let empty = DataTableProps::new(Vec::new(), columns());
        assert_eq!(state.view(&empty), TableView::Empty);
    }

    #[test]
    fn test_set_records_prunes_selection() {
        let records = numbers();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut table = DataTable::new(DataTableProps::new(records.clone(), columns()).selectable(true))
            .on_selection_change(move |selected| sink.borrow_mut().push(selected.len()));

        table.handle(TableEvent::RowClicked(0));
        table.handle(TableEvent::RowClicked(1));
        table.set_records(vec![Rc::clone(&records[1])]);

        assert_eq!(table.state().selection().len(), 1);
        assert!(Rc::ptr_eq(&table.state().selection()[0], &records[1]));
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_set_columns_clears_stale_sort() {
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns())).with_sort(SortState::ascending("n"));
        assert!(table.state().sort().is_some());
        table.set_columns(vec![Column::new("name", "Name")]);
        assert!(table.state().sort().is_none());
    }

    #[test]
    fn test_keyboard_sort_and_toggle() {
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()).selectable(true));
        assert!(table.handle_key(key(KeyCode::Char('1'))));
        assert_eq!(table.state().sort(), Some(&SortState::ascending("n")));

        assert!(table.handle_key(key(KeyCode::Down)));
        assert!(table.handle_key(key(KeyCode::Char(' '))));
        assert_eq!(table.state().selection()[0].cell_text("n"), "2");

        assert!(!table.handle_key(key(KeyCode::Char('9'))));
    }

    #[test]
    fn test_render_loading_placeholder_ignores_records() {
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()).loading(true));
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Name"));
    }

    #[test]
    fn test_render_empty_placeholder() {
        let mut table = DataTable::new(DataTableProps::new(Vec::new(), columns()));
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();
        assert!(screen_text(&terminal).contains("No data available"));
    }

    #[test]
    fn test_mouse_hits_after_render() {
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()).selectable(true));
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();

        // Border at y=0, header at y=1, first row at y=2. Checkbox + separator take 6 columns.
        assert_eq!(table.event_at(7, 1), Some(TableEvent::HeaderClicked("n".into())));
        assert_eq!(table.event_at(2, 3), Some(TableEvent::RowClicked(1)));
        assert_eq!(table.event_at(2, 6), None);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert!(table.handle_mouse(click));
        assert_eq!(table.state().selection().len(), 1);

        terminal.draw(|f| table.render(f, f.size())).unwrap();
        assert!(screen_text(&terminal).contains("[x]"));
    }

    #[test]
    fn test_scroll_only_over_rows() {
        let mut table = DataTable::new(DataTableProps::new(numbers(), columns()));
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();

        let scroll = |row: u16| MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 2,
            row,
            modifiers: KeyModifiers::NONE,
        };

        // Bottom border and below the table
        assert!(!table.handle_mouse(scroll(7)));
        assert!(!table.handle_mouse(scroll(20)));
        assert_eq!(table.state().cursor(), 0);

        assert!(table.handle_mouse(scroll(3)));
        assert_eq!(table.state().cursor(), 1);
    }

    #[test]
    fn test_borderless_narrow_columns() {
        let records = vec![
            record(json!({"n": 1, "name": "abcdef"})),
            record(json!({"n": 2, "name": "xy"})),
        ];
        let config = DataTableConfig::new("Compact")
            .without_borders()
            .with_max_column_width(4);
        let mut table = DataTable::new(DataTableProps::new(records, columns())).with_config(config);
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();

        let text = screen_text(&terminal);
        assert!(!text.contains("Compact"));
        assert!(!text.contains('┌'));
        assert!(text.contains("abc…"));

        // No border: header on the first row, data right below it
        assert_eq!(table.event_at(0, 0), Some(TableEvent::HeaderClicked("n".into())));
        assert_eq!(table.event_at(6, 0), Some(TableEvent::HeaderClicked("name".into())));
        assert_eq!(table.event_at(0, 1), Some(TableEvent::RowClicked(0)));
    }

    #[test]
    fn test_missing_field_renders_blank() {
        let records = vec![record(json!({"n": 1}))];
        let table = DataTable::new(DataTableProps::new(records, vec![Column::new("n", "N"), Column::new("email", "Email")]));
        let text = table.to_plain_text();
        let row = text.lines().nth(2).unwrap();
        assert_eq!(row, "1   |");
        assert!(text.lines().next().unwrap().contains("Email"));
    }

    #[test]
    fn test_plain_text_shows_sort_indicator() {
        let table = DataTable::new(DataTableProps::new(numbers(), columns())).with_sort(SortState::descending("n"));
        let text = table.to_plain_text();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().contains("N ▼"));
        lines.next();
        assert!(lines.next().unwrap().starts_with('3'));
    }

    #[test]
    fn test_fit_cell() {
        assert_eq!(fit_cell("abc", 5), "abc  ");
        assert_eq!(fit_cell("abcdef", 4), "abc…");
        assert_eq!(fit_cell("", 2), "  ");
    }
}
