//! Labeled text/password input with variants, sizes, clear and reveal actions
//!
//! The field owns its buffer: a supplied value only seeds it when the field is
//! built. Later prop updates restyle the field but never overwrite what the
//! user typed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::ui::{contains, FieldSize, FieldStatus, FieldVariant, Styles};

const CLEAR_LABEL: &str = "[x]";
const SHOW_LABEL: &str = "[show]";
const HIDE_LABEL: &str = "[hide]";

/// Called with the whole new value after every edit
pub type ChangeNotifier = Box<dyn FnMut(&str)>;

/// Caller-supplied inputs of a text field
#[derive(Debug, Clone)]
pub struct TextFieldProps {
    /// Seed for the buffer, read once at construction
    pub value: Option<String>,
    pub label: String,
    pub placeholder: String,
    pub helper_text: Option<String>,
    pub error_message: Option<String>,
    pub disabled: bool,
    pub invalid: bool,
    pub variant: FieldVariant,
    pub size: FieldSize,
    pub password: bool,
    pub clearable: bool,
    pub mask_char: char,
}

impl Default for TextFieldProps {
    fn default() -> Self {
        Self {
            value: None,
            label: String::new(),
            placeholder: String::new(),
            helper_text: None,
            error_message: None,
            disabled: false,
            invalid: false,
            variant: FieldVariant::default(),
            size: FieldSize::default(),
            password: false,
            clearable: false,
            mask_char: '*',
        }
    }
}

impl TextFieldProps {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_helper_text(mut self, helper: &str) -> Self {
        self.helper_text = Some(helper.to_string());
        self
    }

    pub fn with_error_message(mut self, error: &str) -> Self {
        self.error_message = Some(error.to_string());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn variant(mut self, variant: FieldVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: FieldSize) -> Self {
        self.size = size;
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn with_mask_char(mut self, mask: char) -> Self {
        self.mask_char = mask;
        self
    }

    /// Error text wins over helper text, but only while the field is invalid.
    pub fn message(&self) -> Option<FieldMessage<'_>> {
        match (&self.error_message, &self.helper_text) {
            (Some(error), _) if self.invalid => Some(FieldMessage::Error(error)),
            (_, Some(helper)) => Some(FieldMessage::Helper(helper)),
            _ => None,
        }
    }
}

/// Line shown under the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMessage<'a> {
    Error(&'a str),
    Helper(&'a str),
}

/// Discrete user interactions a field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    Clear,
    ToggleVisibility,
}

/// What an applied action changed that the caller may care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    ValueChanged(String),
    VisibilityToggled(bool),
}

/// Per-instance field state. Cursor is a char index into the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    value: String,
    cursor: usize,
    visible: bool,
}

impl FieldState {
    /// Fresh state seeded from the props, cursor at the end, password masked.
    pub fn seeded(props: &TextFieldProps) -> Self {
        let value = props.value.clone().unwrap_or_default();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            visible: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the clear affordance is offered right now
    pub fn can_clear(&self, props: &TextFieldProps) -> bool {
        props.clearable && !props.disabled && !self.value.is_empty()
    }

    /// Value as shown: masked in password mode until revealed
    pub fn display_text(&self, props: &TextFieldProps) -> String {
        if props.password && !self.visible {
            std::iter::repeat(props.mask_char)
                .take(self.value.chars().count())
                .collect()
        } else {
            self.value.clone()
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Apply one action. Disabled fields ignore everything.
    pub fn apply(&mut self, action: FieldAction, props: &TextFieldProps) -> Option<FieldOutcome> {
        if props.disabled {
            return None;
        }

        match action {
            FieldAction::Insert(c) => {
                if c.is_control() {
                    return None;
                }
                let at = self.byte_index();
                self.value.insert(at, c);
                self.cursor += 1;
            }
            FieldAction::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                let at = self.byte_index();
                self.value.remove(at);
            }
            FieldAction::Delete => {
                if self.cursor >= self.char_count() {
                    return None;
                }
                let at = self.byte_index();
                self.value.remove(at);
            }
            FieldAction::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                return None;
            }
            FieldAction::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                return None;
            }
            FieldAction::CursorHome => {
                self.cursor = 0;
                return None;
            }
            FieldAction::CursorEnd => {
                self.cursor = self.char_count();
                return None;
            }
            FieldAction::Clear => {
                if !self.can_clear(props) {
                    return None;
                }
                self.value.clear();
                self.cursor = 0;
                debug!("Field '{}' cleared", props.label);
            }
            FieldAction::ToggleVisibility => {
                if !props.password {
                    return None;
                }
                self.visible = !self.visible;
                debug!("Field '{}' visibility: {}", props.label, self.visible);
                return Some(FieldOutcome::VisibilityToggled(self.visible));
            }
        }

        Some(FieldOutcome::ValueChanged(self.value.clone()))
    }
}

/// Screen regions of the inline actions from the last render
#[derive(Debug, Clone, Copy, Default)]
struct FieldHit {
    clear: Option<Rect>,
    toggle: Option<Rect>,
}

/// Text field component
pub struct TextField {
    props: TextFieldProps,
    state: FieldState,
    on_change: Option<ChangeNotifier>,
    focused: bool,
    scroll: usize,
    hit: FieldHit,
}

impl TextField {
    pub fn new(props: TextFieldProps) -> Self {
        let state = FieldState::seeded(&props);
        Self {
            props,
            state,
            on_change: None,
            focused: false,
            scroll: 0,
            hit: FieldHit::default(),
        }
    }

    pub fn on_change(mut self, notifier: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(notifier));
        self
    }

    pub fn props(&self) -> &TextFieldProps {
        &self.props
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn value(&self) -> &str {
        self.state.value()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replace the props. The buffer keeps what was typed; `value` is not re-read.
    pub fn update_props(&mut self, props: TextFieldProps) {
        self.props = props;
    }

    /// Apply an action and notify on value changes
    pub fn handle(&mut self, action: FieldAction) -> Option<FieldOutcome> {
        let outcome = self.state.apply(action, &self.props);
        if let Some(FieldOutcome::ValueChanged(value)) = &outcome {
            if let Some(notifier) = self.on_change.as_mut() {
                notifier(value);
            }
        }
        outcome
    }

    /// Map a key to an action. Returns true if the field used the key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.props.disabled {
            return false;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('u') if ctrl => FieldAction::Clear,
            KeyCode::Char('r') if ctrl => FieldAction::ToggleVisibility,
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => FieldAction::Insert(c),
            KeyCode::Backspace => FieldAction::Backspace,
            KeyCode::Delete => FieldAction::Delete,
            KeyCode::Left => FieldAction::CursorLeft,
            KeyCode::Right => FieldAction::CursorRight,
            KeyCode::Home => FieldAction::CursorHome,
            KeyCode::End => FieldAction::CursorEnd,
            _ => return false,
        };

        self.handle(action);
        true
    }

    /// Forget the action regions, for frames where the field is not drawn
    pub fn clear_hits(&mut self) {
        self.hit = FieldHit::default();
    }

    /// Clicks on the inline `[x]` and `[show]`/`[hide]` actions
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.props.disabled {
            return false;
        }

        let action = if self.hit.clear.is_some_and(|r| contains(r, mouse.column, mouse.row)) {
            FieldAction::Clear
        } else if self.hit.toggle.is_some_and(|r| contains(r, mouse.column, mouse.row)) {
            FieldAction::ToggleVisibility
        } else {
            return false;
        };

        self.handle(action);
        true
    }

    fn status(&self) -> FieldStatus {
        if self.props.disabled {
            FieldStatus::Disabled
        } else if self.props.invalid {
            FieldStatus::Invalid
        } else if self.focused {
            FieldStatus::Focused
        } else {
            FieldStatus::Normal
        }
    }

    /// Rows needed to draw the label, the box and the message line
    pub fn height(&self) -> u16 {
        let label = u16::from(!self.props.label.is_empty());
        let message = u16::from(self.props.message().is_some());
        label + self.props.size.box_height(self.props.variant) + message
    }

    /// Render the field
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.hit = FieldHit::default();
        let status = self.status();
        let mut y = area.y;
        let bottom = area.y.saturating_add(area.height);

        if !self.props.label.is_empty() && y < bottom {
            let label = Paragraph::new(self.props.label.clone()).style(Styles::field_label(status));
            f.render_widget(label, Rect { y, height: 1, ..area });
            y += 1;
        }

        let box_height = self
            .props
            .size
            .box_height(self.props.variant)
            .min(bottom.saturating_sub(y));
        let box_area = Rect { y, height: box_height, ..area };
        y += box_height;

        let block = Styles::field_block(self.props.variant, self.props.size, status);
        let inner = block.inner(box_area);
        f.render_widget(block, box_area);

        if inner.width > 0 && inner.height > 0 {
            self.render_input(f, inner, status);
        }

        if let Some(message) = self.props.message() {
            if y < bottom {
                let (text, style) = match message {
                    FieldMessage::Error(text) => (text, Styles::error()),
                    FieldMessage::Helper(text) => (text, Styles::helper_text()),
                };
                f.render_widget(
                    Paragraph::new(text.to_string()).style(style),
                    Rect { y, height: 1, ..area },
                );
            }
        }
    }

    fn render_input(&mut self, f: &mut Frame, inner: Rect, status: FieldStatus) {
        let line_area = Rect { height: 1, ..inner };

        // Inline actions, right aligned
        let mut actions: Vec<(&str, bool)> = Vec::new();
        if self.state.can_clear(&self.props) {
            actions.push((CLEAR_LABEL, true));
        }
        if self.props.password {
            let label = if self.state.is_visible() { HIDE_LABEL } else { SHOW_LABEL };
            actions.push((label, false));
        }

        let actions_width: u16 = actions.iter().map(|(label, _)| label.len() as u16 + 1).sum();
        let text_width = line_area.width.saturating_sub(actions_width);

        let mut x = line_area.x + text_width;
        for (label, is_clear) in &actions {
            x += 1;
            let width = label.len() as u16;
            if x + width > line_area.x + line_area.width {
                break;
            }
            let rect = Rect::new(x, line_area.y, width, 1);
            f.render_widget(
                Paragraph::new(label.to_string()).style(Styles::affordance(status)),
                rect,
            );
            if *is_clear {
                self.hit.clear = Some(rect);
            } else {
                self.hit.toggle = Some(rect);
            }
            x += width;
        }

        let text_area = Rect { width: text_width, ..line_area };
        if text_area.width == 0 {
            return;
        }

        if self.state.value().is_empty() {
            self.scroll = 0;
            let placeholder = Paragraph::new(Line::from(Span::styled(
                self.props.placeholder.clone(),
                Styles::placeholder(),
            )));
            f.render_widget(placeholder, text_area);
        } else {
            let display: Vec<char> = self.state.display_text(&self.props).chars().collect();
            let cursor = self.state.cursor().min(display.len());
            self.scroll = visible_start(&display, cursor, self.scroll, text_area.width as usize);
            let visible: String = display[self.scroll..].iter().collect();
            f.render_widget(
                Paragraph::new(visible).style(Styles::field_text(status)),
                text_area,
            );
        }

        if self.focused && !self.props.disabled {
            let display: Vec<char> = self.state.display_text(&self.props).chars().collect();
            let cursor = self.state.cursor().min(display.len());
            let offset = width_of(&display[self.scroll.min(cursor)..cursor]);
            let cursor_x = text_area.x.saturating_add(offset as u16);
            if cursor_x < text_area.x + text_area.width {
                f.set_cursor(cursor_x, text_area.y);
            }
        }
    }
}

fn width_of(chars: &[char]) -> usize {
    chars.iter().map(|c| c.width().unwrap_or(0)).sum()
}

/// First visible char index so the cursor stays inside `width` columns.
fn visible_start(display: &[char], cursor: usize, scroll: usize, width: usize) -> usize {
    let mut start = scroll.min(cursor);
    while start < cursor && width_of(&display[start..cursor]) >= width {
        start += 1;
    }
    start
}
