//! Status line that echoes component notifications in the story browser

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::Styles;

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    /// A change notification fired by a component
    Notification,
    Error,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(message, StatusType::Info)
    }

    pub fn notification(message: String) -> Self {
        Self::new(message, StatusType::Notification)
    }

    pub fn error(message: String) -> Self {
        Self::new(message, StatusType::Error)
    }
}

/// Status display component
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    /// Shown when there is no message
    pub idle_text: String,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 100,
            idle_text: "Ready".to_string(),
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn set_idle_text(&mut self, text: String) {
        self.idle_text = text;
    }

    /// Set current status message, pushing the previous one into history
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::info(message));
    }

    pub fn set_notification(&mut self, message: String) {
        self.set_message(StatusMessage::notification(message));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::error(message));
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Render the status display
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Notification => Styles::success(),
                    StatusType::Error => Styles::error(),
                };
                (self.format_message(message), style)
            }
            None => (self.idle_text.clone(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(content).style(style).block(block), area);
    }

    fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Notification => "→",
            StatusType::Error => "✗",
        };

        format!(
            "{} [{}] {}",
            prefix,
            message.timestamp.format("%H:%M:%S"),
            message.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut status = StatusDisplay::new().with_history(2);
        for i in 0..5 {
            status.set_info(format!("message {}", i));
        }
        assert_eq!(status.get_current().unwrap().message, "message 4");
        let history: Vec<_> = status.get_history().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(history, vec!["message 2", "message 3"]);
    }

    #[test]
    fn test_format_message() {
        let status = StatusDisplay::new();
        let message = StatusMessage::notification("onChange(\"a\")".to_string());
        let expected = format!("→ [{}] onChange(\"a\")", message.timestamp.format("%H:%M:%S"));
        assert_eq!(status.format_message(&message), expected);

        let error = StatusMessage::error("tty closed".to_string());
        assert!(status.format_message(&error).starts_with("✗ ["));
    }
}
