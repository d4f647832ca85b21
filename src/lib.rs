//! termblocks: a sortable, selectable data table and a styled text field for
//! ratatui, plus a story browser that documents them.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod stories;
pub mod ui;

pub use components::{DataTable, DataTableProps, TextField, TextFieldProps};
pub use error::TermblocksError;
pub use models::{Column, Record, SortDirection, SortState};
