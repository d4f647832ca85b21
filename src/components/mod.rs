//! Reusable UI components
//!
//! The two building blocks, [`DataTable`] and [`TextField`], are independent
//! leaf components. [`StatusDisplay`] is the status line used by the story
//! browser.

pub mod data_table;
pub mod status_display;
pub mod text_field;

pub use data_table::{DataTable, DataTableConfig, DataTableProps, TableEvent, TableOutcome, TableState, TableView};
pub use status_display::{StatusDisplay, StatusType};
pub use text_field::{FieldAction, FieldMessage, FieldOutcome, FieldState, TextField, TextFieldProps};
