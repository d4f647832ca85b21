//! Documentation stories: named sample invocations of the components
//!
//! Each story owns its component instances and reports change notifications
//! back to the browser so they can be shown in the status line.

pub mod field;
pub mod table;

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::config::Config;
use crate::error::{Result, TermblocksError};

pub use field::FieldStory;
pub use table::TableStory;

/// Result of routing an input event to a story
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryAction {
    /// The story did not use the event
    Ignored,
    /// The event was used, nothing to report
    Handled,
    /// The event was used and a component fired its notifier
    Notify(String),
}

/// Component a story documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryGroup {
    Table,
    Field,
}

impl StoryGroup {
    pub fn as_str(&self) -> &str {
        match self {
            StoryGroup::Table => "Table",
            StoryGroup::Field => "Field",
        }
    }
}

/// Core trait for all stories
pub trait Story {
    /// Stable identifier used on the command line
    fn id(&self) -> &str;

    fn title(&self) -> &str;

    fn group(&self) -> StoryGroup;

    fn description(&self) -> &str;

    /// Draw the story content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    fn handle_key(&mut self, key: KeyEvent) -> StoryAction;

    fn handle_mouse(&mut self, mouse: MouseEvent) -> StoryAction;

    /// Called when keyboard focus moves into or out of the story
    fn set_focus(&mut self, focused: bool);

    /// Whether plain character keys go to a text input right now
    fn captures_text(&self) -> bool {
        false
    }

    /// Shortcut summary shown in the help popup
    fn keys_help(&self) -> &str;
}

/// Shared sink the component notifiers write into
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.entries.borrow_mut().push(entry);
    }

    /// Drain pending entries and keep the most recent
    pub fn take_last(&self) -> Option<String> {
        self.entries.borrow_mut().drain(..).last()
    }

    /// Turn "was the event used" plus pending notifications into a story action
    pub fn finish(&self, used: bool) -> StoryAction {
        match self.take_last() {
            Some(entry) => StoryAction::Notify(entry),
            None if used => StoryAction::Handled,
            None => StoryAction::Ignored,
        }
    }
}

/// Every built-in story, tables first
pub fn catalogue(config: &Config) -> Vec<Box<dyn Story>> {
    let mut stories = table::stories();
    stories.extend(field::stories(config.mask_char));
    stories
}

/// Position of the story with `id`
pub fn find_index(stories: &[Box<dyn Story>], id: &str) -> Result<usize> {
    stories
        .iter()
        .position(|s| s.id() == id)
        .ok_or_else(|| TermblocksError::UnknownStory(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_ids_unique() {
        let stories = catalogue(&Config::default());
        let ids: HashSet<_> = stories.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids.len(), stories.len());
        assert!(stories.iter().any(|s| s.group() == StoryGroup::Table));
        assert!(stories.iter().any(|s| s.group() == StoryGroup::Field));
    }

    #[test]
    fn test_find_index() {
        let stories = catalogue(&Config::default());
        assert_eq!(find_index(&stories, "table-default").unwrap(), 0);
        assert!(matches!(
            find_index(&stories, "nope"),
            Err(TermblocksError::UnknownStory(_))
        ));
    }

    #[test]
    fn test_notification_log_finish() {
        let log = NotificationLog::new();
        assert_eq!(log.finish(false), StoryAction::Ignored);
        assert_eq!(log.finish(true), StoryAction::Handled);
        log.push("a".into());
        log.push("b".into());
        assert_eq!(log.finish(true), StoryAction::Notify("b".into()));
        assert_eq!(log.take_last(), None);
    }
}
