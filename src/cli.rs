use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::{Column, SortState};

#[derive(Parser)]
#[command(name = "termblocks")]
#[command(about = "Browse the termblocks table and field stories in your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Story to open at startup (see `termblocks list`)
    #[arg(long, global = true)]
    pub story: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the story catalogue and exit
    List,

    /// Show records from a JSON file in a selectable table
    Table {
        /// JSON array of objects, or {"columns": [...], "records": [...], "sort": {...}}
        #[arg(short, long)]
        records: PathBuf,

        /// Columns as key:Header pairs, comma separated (defaults to the file's columns)
        #[arg(short, long)]
        columns: Option<String>,

        /// Initial sort as key, key:asc or key:desc
        #[arg(short, long)]
        sort: Option<String>,

        /// Print the table as plain text and exit instead of opening the browser
        #[arg(long)]
        cli: bool,
    },
}

impl Commands {
    pub fn parse_columns(columns: &Option<String>) -> Result<Option<Vec<Column>>> {
        columns.as_deref().map(Column::parse_list).transpose()
    }

    pub fn parse_sort(sort: &Option<String>) -> Result<Option<SortState>> {
        sort.as_deref().map(SortState::parse_spec).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_command() {
        let cli = Cli::parse_from([
            "termblocks",
            "table",
            "--records",
            "people.json",
            "--columns",
            "name:Name,age",
            "--sort",
            "age:desc",
            "--cli",
        ]);

        match cli.command {
            Some(Commands::Table { records, columns, sort, cli }) => {
                assert_eq!(records, PathBuf::from("people.json"));
                assert!(cli);
                let columns = Commands::parse_columns(&columns).unwrap().unwrap();
                assert_eq!(columns, vec![Column::new("name", "Name"), Column::new("age", "age")]);
                assert_eq!(Commands::parse_sort(&sort).unwrap(), Some(SortState::descending("age")));
            }
            _ => panic!("expected table command"),
        }
    }

    #[test]
    fn test_parse_story_flag() {
        let cli = Cli::parse_from(["termblocks", "--story", "field-password"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.story.as_deref(), Some("field-password"));
    }
}
