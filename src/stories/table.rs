//! Table stories

use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Paragraph, Wrap},
    Frame,
};
use serde_json::json;

use crate::{
    components::{DataTable, DataTableConfig, DataTableProps},
    models::{Column, Record, RecordSet, SortState},
    ui::Styles,
};

use super::{NotificationLog, Story, StoryAction, StoryGroup};

const KEYS_HELP: &str = "↑/↓ - Move row cursor\n\
    Space/Enter - Toggle row (selectable tables)\n\
    1-9 - Sort by column N\n\
    ←/→ + s - Sort by column under header cursor\n\
    Mouse - Click headers to sort, rows to select";

/// A single table with a caption
pub struct TableStory {
    id: String,
    title: String,
    description: String,
    table: DataTable,
    log: NotificationLog,
    /// `l` flips the loading flag in this story
    loading_toggle: bool,
}

impl TableStory {
    pub fn new(id: &str, title: &str, description: &str, props: DataTableProps) -> Self {
        let log = NotificationLog::new();
        let table = Self::build_table(title, props, &log);
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            table,
            log,
            loading_toggle: false,
        }
    }

    /// Story over caller-supplied records, always selectable
    pub fn from_record_set(set: RecordSet, sort: Option<SortState>) -> Self {
        let count = set.records.len();
        let props = DataTableProps::new(set.records, set.columns).selectable(true);
        let mut story = Self::new(
            "records",
            "Loaded records",
            &format!("{} records loaded from file. Click headers to sort, rows to select.", count),
            props,
        );
        if let Some(sort) = sort {
            story = story.with_sort(sort);
        }
        story
    }

    fn build_table(title: &str, props: DataTableProps, log: &NotificationLog) -> DataTable {
        let label_key = props.columns.first().map(|c| c.key.clone()).unwrap_or_default();
        let log = log.clone();
        DataTable::new(props)
            .with_config(DataTableConfig::new(title))
            .on_selection_change(move |selected: &[Rc<Record>]| {
                let labels: Vec<String> = selected.iter().map(|r| r.cell_text(&label_key)).collect();
                log.push(format!("onSelectionChange([{}])", labels.join(", ")));
            })
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.table = self.table.with_sort(sort);
        self
    }

    pub fn with_table_config(mut self, config: DataTableConfig) -> Self {
        self.table = self.table.with_config(config);
        self
    }

    fn with_loading_toggle(mut self) -> Self {
        self.loading_toggle = true;
        self
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }
}

impl Story for TableStory {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn group(&self) -> StoryGroup {
        StoryGroup::Table
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let caption = Paragraph::new(self.description.clone())
            .style(Styles::inactive())
            .wrap(Wrap { trim: true });
        f.render_widget(caption, chunks[0]);

        self.table.render(f, chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> StoryAction {
        if self.loading_toggle && key.code == KeyCode::Char('l') {
            let loading = !self.table.props().loading;
            self.table.set_loading(loading);
            return StoryAction::Handled;
        }
        let used = self.table.handle_key(key);
        self.log.finish(used)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> StoryAction {
        let used = self.table.handle_mouse(mouse);
        self.log.finish(used)
    }

    fn set_focus(&mut self, focused: bool) {
        self.table.set_focus(focused);
    }

    fn keys_help(&self) -> &str {
        KEYS_HELP
    }
}

fn record(value: serde_json::Value) -> Rc<Record> {
    match value {
        serde_json::Value::Object(fields) => Rc::new(Record::new(fields)),
        _ => Rc::new(Record::default()),
    }
}

/// Sample records used by the built-in stories
pub fn sample_people() -> Vec<Rc<Record>> {
    vec![
        record(json!({"name": "Grace Hopper", "age": 85, "role": "Admiral", "email": "grace@navy.mil"})),
        record(json!({"name": "Ada Lovelace", "age": 36, "role": "Analyst"})),
        record(json!({"name": "Linus Torvalds", "age": 54, "role": "Maintainer", "email": "linus@kernel.org"})),
        record(json!({"name": "Margaret Hamilton", "age": 88, "role": "Director"})),
        record(json!({"name": "Dennis Ritchie", "age": 70, "role": "Researcher", "email": "dmr@bell-labs.com"})),
    ]
}

pub fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("age", "Age"),
        Column::new("role", "Role"),
    ]
}

pub(super) fn stories() -> Vec<Box<dyn super::Story>> {
    let people = sample_people();
    let mut with_email = sample_columns();
    with_email.push(Column::new("email", "Email"));

    vec![
        Box::new(TableStory::new(
            "table-default",
            "Default",
            "Records rendered in input order. Headers are clickable.",
            DataTableProps::new(people.clone(), sample_columns()),
        )),
        Box::new(
            TableStory::new(
                "table-sortable",
                "Sorted",
                "Starts sorted by age, descending. Click Age to flip, another header to switch.",
                DataTableProps::new(people.clone(), sample_columns()),
            )
            .with_sort(SortState::descending("age")),
        ),
        Box::new(TableStory::new(
            "table-selectable",
            "Selectable",
            "Click a row (or Space) to toggle it. The selection is echoed in the status line.",
            DataTableProps::new(people.clone(), sample_columns()).selectable(true),
        )),
        Box::new(
            TableStory::new(
                "table-loading",
                "Loading",
                "Loading placeholder, records are not processed. Press l to toggle loading.",
                DataTableProps::new(people.clone(), sample_columns()).loading(true),
            )
            .with_loading_toggle(),
        ),
        Box::new(TableStory::new(
            "table-empty",
            "Empty",
            "No records: the empty-state placeholder is shown.",
            DataTableProps::new(Vec::new(), sample_columns()),
        )),
        Box::new(TableStory::new(
            "table-missing-field",
            "Missing field",
            "Not every record has an email; missing cells render blank.",
            DataTableProps::new(people.clone(), with_email.clone()).selectable(true),
        )),
        Box::new(
            TableStory::new(
                "table-compact",
                "Compact",
                "No borders, columns capped at 12 cells. Long values are truncated.",
                DataTableProps::new(people, with_email).selectable(true),
            )
            .with_table_config(DataTableConfig::new("Compact").without_borders().with_max_column_width(12)),
        ),
    ]
}
