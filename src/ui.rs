//! Styling contract shared by the components
//!
//! Everything visual lives here: component logic only ever hands over a
//! variant, a size and a status, and gets back ratatui styles, borders and
//! padding. Keeping it in one place means behaviour can be tested without
//! caring about colours.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Padding},
};

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn placeholder() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }

    /// Highlighted row under the keyboard cursor
    pub fn cursor_row() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Rows that are members of the selection set
    pub fn checked_row() -> Style {
        Style::default().fg(Color::LightGreen)
    }

    pub fn table_header(active: bool) -> Style {
        if active {
            Self::title().add_modifier(Modifier::UNDERLINED)
        } else {
            Self::title()
        }
    }

    /// Inline affordances such as `[x]` and `[show]`
    pub fn affordance(status: FieldStatus) -> Style {
        match status {
            FieldStatus::Disabled => Self::inactive(),
            _ => Style::default().fg(Color::Cyan),
        }
    }

    pub fn field_label(status: FieldStatus) -> Style {
        match status {
            FieldStatus::Disabled => Self::inactive(),
            FieldStatus::Invalid => Self::error().add_modifier(Modifier::BOLD),
            _ => Style::default().add_modifier(Modifier::BOLD),
        }
    }

    pub fn field_text(status: FieldStatus) -> Style {
        match status {
            FieldStatus::Disabled => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            _ => Style::default(),
        }
    }

    pub fn helper_text() -> Style {
        Self::inactive()
    }

    fn field_border(status: FieldStatus) -> Style {
        match status {
            FieldStatus::Focused => Self::active_border(),
            FieldStatus::Invalid => Self::error(),
            FieldStatus::Disabled => Style::default().fg(Color::DarkGray),
            FieldStatus::Normal => Self::inactive_border(),
        }
    }

    /// Build the input box block for a field.
    pub fn field_block(variant: FieldVariant, size: FieldSize, status: FieldStatus) -> Block<'static> {
        let block = Block::default()
            .borders(variant.borders())
            .border_style(Self::field_border(status))
            .padding(size.padding());

        match (variant, status) {
            (_, FieldStatus::Disabled) => block.style(Style::default().bg(Color::Black)),
            (FieldVariant::Filled, _) => block.style(Style::default().bg(Color::DarkGray)),
            _ => block,
        }
    }
}

/// Visual variant of a text field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldVariant {
    /// Shaded background, underline only
    Filled,
    /// Full border
    #[default]
    Outlined,
    /// No border, no background
    Ghost,
}

impl FieldVariant {
    pub const ALL: [FieldVariant; 3] = [FieldVariant::Filled, FieldVariant::Outlined, FieldVariant::Ghost];

    pub fn as_str(&self) -> &str {
        match self {
            FieldVariant::Filled => "filled",
            FieldVariant::Outlined => "outlined",
            FieldVariant::Ghost => "ghost",
        }
    }

    pub fn borders(&self) -> Borders {
        match self {
            FieldVariant::Filled => Borders::BOTTOM,
            FieldVariant::Outlined => Borders::ALL,
            FieldVariant::Ghost => Borders::NONE,
        }
    }
}

/// Size preset of a text field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FieldSize {
    pub const ALL: [FieldSize; 3] = [FieldSize::Small, FieldSize::Medium, FieldSize::Large];

    pub fn as_str(&self) -> &str {
        match self {
            FieldSize::Small => "small",
            FieldSize::Medium => "medium",
            FieldSize::Large => "large",
        }
    }

    pub fn padding(&self) -> Padding {
        match self {
            FieldSize::Small => Padding::zero(),
            FieldSize::Medium => Padding::horizontal(1),
            FieldSize::Large => Padding::new(2, 2, 1, 1),
        }
    }

    /// Rows taken by the input box for a given variant, borders included.
    pub fn box_height(&self, variant: FieldVariant) -> u16 {
        let padding = self.padding();
        let borders = variant.borders();
        let mut height = 1 + padding.top + padding.bottom;
        if borders.contains(Borders::TOP) {
            height += 1;
        }
        if borders.contains(Borders::BOTTOM) {
            height += 1;
        }
        height
    }
}

/// Interaction status that drives field styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Normal,
    Focused,
    Invalid,
    Disabled,
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// True when the terminal cell (column, row) falls inside `area`
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
