//! Story browser: catalogue sidebar, active story, status line

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use crate::{
    components::StatusDisplay,
    config::Config,
    stories::{self, Story, StoryAction},
    ui::{centered_rect, contains, Styles},
};

/// Status lines listed in the help popup
const RECENT_MESSAGES: usize = 5;

const STATUS_HISTORY: usize = 50;

/// Which pane receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Story,
}

/// Main browser state
pub struct StoryBrowser {
    pub stories: Vec<Box<dyn Story>>,
    pub active: usize,
    pub focus: Focus,
    pub config: Config,
    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
    sidebar_state: ListState,
    sidebar_area: Rect,
}

impl StoryBrowser {
    pub fn new(config: Config, stories: Vec<Box<dyn Story>>) -> Self {
        let mut sidebar_state = ListState::default();
        if !stories.is_empty() {
            sidebar_state.select(Some(0));
        }

        let mut status = StatusDisplay::new().with_history(STATUS_HISTORY);
        status.set_idle_text("Tab: Switch pane | ↑/↓: Choose story | F1/?: Help | q: Quit".to_string());

        Self {
            stories,
            active: 0,
            focus: Focus::Sidebar,
            config,
            status,
            should_quit: false,
            show_help_popup: false,
            sidebar_state,
            sidebar_area: Rect::default(),
        }
    }

    /// Open the story with `id`
    pub fn open(&mut self, id: &str) -> crate::error::Result<()> {
        let index = stories::find_index(&self.stories, id)?;
        self.activate(index);
        Ok(())
    }

    fn activate(&mut self, index: usize) {
        if index >= self.stories.len() {
            return;
        }
        if let Some(story) = self.stories.get_mut(self.active) {
            story.set_focus(false);
        }
        self.active = index;
        self.sidebar_state.select(Some(index));
        let story = &mut self.stories[index];
        story.set_focus(self.focus == Focus::Story);
        debug!("Opened story '{}'", story.id());
        let message = format!("{}: {}", story.title(), story.description());
        self.status.set_info(message);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if let Some(story) = self.stories.get_mut(self.active) {
            story.set_focus(focus == Focus::Story);
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(self.config.tick_rate());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!("Story browser started with {} stories", self.stories.len());

        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => self.report_stream_error(&e),
                    None => break,
                },
                _ = ticker.tick() => {}
            }
        }

        info!("Story browser exiting");
        Ok(())
    }

    fn report_stream_error(&mut self, error: &std::io::Error) {
        warn!("Event stream error: {}", error);
        self.status.set_error(format!("Input error: {}", error));
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        let story_owns_text = self.focus == Focus::Story
            && self
                .stories
                .get(self.active)
                .is_some_and(|story| story.captures_text());

        // Global shortcuts
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.focus {
                    Focus::Sidebar => Focus::Story,
                    Focus::Story => Focus::Sidebar,
                };
                self.set_focus(next);
                return;
            }
            KeyCode::F(1) => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::Char('?') if !story_owns_text => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::Char('q') if !story_owns_text => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc if self.focus == Focus::Story => {
                self.set_focus(Focus::Sidebar);
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Story => {
                if let Some(story) = self.stories.get_mut(self.active) {
                    let action = story.handle_key(key);
                    self.apply_story_action(action);
                }
            }
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let count = self.stories.len();
        if count == 0 {
            return;
        }
        match key.code {
            KeyCode::Up => {
                let next = if self.active == 0 { count - 1 } else { self.active - 1 };
                self.activate(next);
            }
            KeyCode::Down => self.activate((self.active + 1) % count),
            KeyCode::Home => self.activate(0),
            KeyCode::End => self.activate(count - 1),
            KeyCode::Enter | KeyCode::Right => self.set_focus(Focus::Story),
            _ => {}
        }
    }

    /// Handle mouse input events
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.show_help_popup {
            return;
        }

        if contains(self.sidebar_area, mouse.column, mouse.row) {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                // Border row on top
                let row = (mouse.row - self.sidebar_area.y) as usize;
                let index = self.sidebar_state.offset() + row.saturating_sub(1);
                if row >= 1 && index < self.stories.len() {
                    self.set_focus(Focus::Sidebar);
                    self.activate(index);
                }
            }
            return;
        }

        if let Some(story) = self.stories.get_mut(self.active) {
            let action = story.handle_mouse(mouse);
            if action != StoryAction::Ignored && self.focus != Focus::Story {
                self.set_focus(Focus::Story);
            }
            self.apply_story_action(action);
        }
    }

    fn apply_story_action(&mut self, action: StoryAction) {
        if let StoryAction::Notify(message) = action {
            info!("{}", message);
            self.status.set_notification(message);
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(rows[0]);

        self.draw_sidebar(f, columns[0]);
        self.draw_story(f, columns[1]);
        self.status.render(f, rows[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_sidebar(&mut self, f: &mut Frame, area: Rect) {
        self.sidebar_area = area;

        let items: Vec<ListItem> = self
            .stories
            .iter()
            .map(|story| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<6}", story.group().as_str()), Styles::inactive()),
                    Span::raw(story.title().to_string()),
                ]))
            })
            .collect();

        let border = if self.focus == Focus::Sidebar {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Stories")
                    .borders(Borders::ALL)
                    .border_style(border),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(list, area, &mut self.sidebar_state);
    }

    fn draw_story(&mut self, f: &mut Frame, area: Rect) {
        let border = if self.focus == Focus::Story {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let Some(story) = self.stories.get_mut(self.active) else {
            let empty = Paragraph::new("No stories")
                .block(Block::default().borders(Borders::ALL).border_style(border));
            f.render_widget(empty, area);
            return;
        };

        let block = Block::default()
            .title(format!("{} / {}", story.group().as_str(), story.title()))
            .borders(Borders::ALL)
            .border_style(border);
        let inner = block.inner(area);
        f.render_widget(block, area);

        story.draw(f, inner);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    /// Get context-sensitive help content
    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Tab - Switch between story list and story\n\
            ESC - Back to story list\n\
            q - Quit (when not typing)\n\
            F1 / ? - Toggle this help\n\n";

        let story_help = self
            .stories
            .get(self.active)
            .map(|story| format!("{}:\n{}", story.title(), story.keys_help()))
            .unwrap_or_default();

        let recent: Vec<String> = self
            .status
            .get_history()
            .iter()
            .chain(self.status.get_current())
            .rev()
            .take(RECENT_MESSAGES)
            .map(|m| format!("  {} {}", m.timestamp.format("%H:%M:%S"), m.message))
            .collect();

        if recent.is_empty() {
            format!("{}{}", global_help, story_help)
        } else {
            format!("{}{}\n\nRecent:\n{}", global_help, story_help, recent.join("\n"))
        }
    }
}
