//! Text field stories

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    components::{TextField, TextFieldProps},
    ui::{FieldSize, FieldVariant, Styles},
};

use super::{NotificationLog, Story, StoryAction, StoryGroup};

const KEYS_HELP: &str = "Type to edit the focused field\n\
    ↑/↓ - Move between fields\n\
    Ctrl+U - Clear (clearable fields)\n\
    Ctrl+R - Show/hide password\n\
    Mouse - Click [x] to clear, [show]/[hide] to toggle";

/// Max width of a field inside the story area
const FIELD_WIDTH: u16 = 48;

/// One or more fields stacked vertically
pub struct FieldStory {
    id: String,
    title: String,
    description: String,
    fields: Vec<TextField>,
    focus: usize,
    focused: bool,
    log: NotificationLog,
}

impl FieldStory {
    pub fn new(id: &str, title: &str, description: &str, props: Vec<TextFieldProps>) -> Self {
        let log = NotificationLog::new();
        let fields = props
            .into_iter()
            .map(|props| {
                let label = props.label.clone();
                let log = log.clone();
                TextField::new(props).on_change(move |value: &str| {
                    log.push(format!("{}: onChange({:?})", label, value));
                })
            })
            .collect();

        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            fields,
            focus: 0,
            focused: false,
            log,
        }
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    fn update_focus(&mut self) {
        let focused = self.focused;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(focused && i == self.focus);
        }
    }

    fn move_focus(&mut self, down: bool) {
        if self.fields.is_empty() {
            return;
        }
        let count = self.fields.len();
        self.focus = if down {
            (self.focus + 1) % count
        } else if self.focus == 0 {
            count - 1
        } else {
            self.focus - 1
        };
        self.update_focus();
    }
}

impl Story for FieldStory {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn group(&self) -> StoryGroup {
        StoryGroup::Field
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let caption_area = Rect { height: area.height.min(2), ..area };
        f.render_widget(
            Paragraph::new(self.description.clone())
                .style(Styles::inactive())
                .wrap(Wrap { trim: true }),
            caption_area,
        );

        let bottom = area.y.saturating_add(area.height);
        let mut y = area.y + caption_area.height;
        let width = area.width.min(FIELD_WIDTH);

        for field in &mut self.fields {
            if y >= bottom {
                field.clear_hits();
                continue;
            }
            let height = field.height().min(bottom - y);
            field.render(f, Rect::new(area.x, y, width, height));
            // One blank row between fields
            y = y.saturating_add(height + 1);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> StoryAction {
        let used = match key.code {
            KeyCode::Up => {
                self.move_focus(false);
                true
            }
            KeyCode::Down => {
                self.move_focus(true);
                true
            }
            _ => match self.fields.get_mut(self.focus) {
                Some(field) => field.handle_key(key),
                None => false,
            },
        };
        self.log.finish(used)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> StoryAction {
        let used = self.fields.iter_mut().any(|field| field.handle_mouse(mouse));
        self.log.finish(used)
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        self.update_focus();
    }

    fn captures_text(&self) -> bool {
        self.focused
            && self
                .fields
                .get(self.focus)
                .is_some_and(|field| !field.props().disabled)
    }

    fn keys_help(&self) -> &str {
        KEYS_HELP
    }
}

pub(super) fn stories(mask_char: char) -> Vec<Box<dyn super::Story>> {
    let base = |label: &str| TextFieldProps::new(label).with_mask_char(mask_char);

    vec![
        Box::new(FieldStory::new(
            "field-default",
            "Default",
            "Outlined, medium, empty with a placeholder.",
            vec![base("Full name").with_placeholder("Jane Doe")],
        )),
        Box::new(FieldStory::new(
            "field-helper",
            "Helper text",
            "Helper text sits under the box.",
            vec![base("Username")
                .with_placeholder("octocat")
                .with_helper_text("Letters, digits and dashes")],
        )),
        Box::new(FieldStory::new(
            "field-invalid",
            "Invalid",
            "Invalid with an error message: the error replaces the helper text.",
            vec![base("Email")
                .with_value("not-an-email")
                .with_helper_text("We never share it")
                .with_error_message("Enter a valid email address")
                .invalid(true)],
        )),
        Box::new(FieldStory::new(
            "field-disabled",
            "Disabled",
            "No typing, clearing or toggling; no notifications fire.",
            vec![base("API key")
                .with_value("sk-live-0000")
                .password(true)
                .clearable(true)
                .disabled(true)],
        )),
        Box::new(FieldStory::new(
            "field-password",
            "Password",
            "Masked by default. Ctrl+R or [show] reveals, again re-masks.",
            vec![base("Password").with_value("hunter2").password(true)],
        )),
        Box::new(FieldStory::new(
            "field-clearable",
            "Clearable",
            "Ctrl+U or [x] empties the field and notifies with an empty string.",
            vec![base("Search").with_value("ratatui").clearable(true)],
        )),
        Box::new(FieldStory::new(
            "field-variants",
            "Variants",
            "Filled, outlined and ghost.",
            FieldVariant::ALL
                .iter()
                .map(|variant| {
                    base(&format!("Variant: {}", variant.as_str()))
                        .variant(*variant)
                        .with_placeholder("Type here")
                })
                .collect(),
        )),
        Box::new(FieldStory::new(
            "field-sizes",
            "Sizes",
            "Small, medium and large.",
            FieldSize::ALL
                .iter()
                .map(|size| {
                    base(&format!("Size: {}", size.as_str()))
                        .size(*size)
                        .with_placeholder("Type here")
                })
                .collect(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn story(id: &str) -> Box<dyn Story> {
        stories('*').into_iter().find(|s| s.id() == id).unwrap()
    }

    #[test]
    fn test_typing_reports_on_change() {
        let mut story = story("field-default");
        story.set_focus(true);
        assert!(story.captures_text());
        assert_eq!(
            story.handle_key(key(KeyCode::Char('J'))),
            StoryAction::Notify("Full name: onChange(\"J\")".into())
        );
        assert_eq!(story.handle_key(key(KeyCode::Left)), StoryAction::Handled);
    }

    #[test]
    fn test_clearable_reports_empty_value() {
        let mut story = story("field-clearable");
        story.set_focus(true);
        let clear = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(
            story.handle_key(clear),
            StoryAction::Notify("Search: onChange(\"\")".into())
        );
    }

    #[test]
    fn test_disabled_story_does_not_capture() {
        let mut story = story("field-disabled");
        story.set_focus(true);
        assert!(!story.captures_text());
        assert_eq!(story.handle_key(key(KeyCode::Char('q'))), StoryAction::Ignored);
    }

    #[test]
    fn test_hidden_field_ignores_old_clicks() {
        let mut story = story("field-clearable");
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        // Caption rows 0-1, label row 2, box rows 3-5; [x] sits at x 35..38 on row 4
        let clear_click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 36,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };

        terminal.draw(|f| story.draw(f, f.size())).unwrap();
        // Only the caption fits, the field is not drawn
        terminal.draw(|f| story.draw(f, Rect::new(0, 0, 40, 2))).unwrap();
        assert_eq!(story.handle_mouse(clear_click), StoryAction::Ignored);

        terminal.draw(|f| story.draw(f, f.size())).unwrap();
        assert_eq!(
            story.handle_mouse(clear_click),
            StoryAction::Notify("Search: onChange(\"\")".into())
        );
    }

    #[test]
    fn test_focus_moves_between_fields() {
        let mut story = FieldStory::new(
            "multi",
            "Multi",
            "",
            vec![TextFieldProps::new("A"), TextFieldProps::new("B")],
        );
        story.set_focus(true);
        assert!(story.fields()[0].is_focused());
        story.handle_key(key(KeyCode::Down));
        assert!(story.fields()[1].is_focused());
        story.handle_key(key(KeyCode::Char('x')));
        assert_eq!(story.fields()[1].value(), "x");
        assert_eq!(story.fields()[0].value(), "");

        story.set_focus(false);
        assert!(!story.fields()[1].is_focused());
    }
}
