//! termblocks story browser entry point

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use termblocks::{
    app::StoryBrowser,
    cli::{Cli, Commands},
    components::{DataTable, DataTableProps},
    config::Config,
    logging,
    models::{RecordSet, SortState},
    stories::{self, Story, TableStory},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let mut catalogue = stories::catalogue(&config);
    let mut start_story = cli.story.clone().or_else(|| config.default_story.clone());
    let mut pending_warning = None;

    match cli.command {
        Some(Commands::List) => {
            logging::init_stderr_logging()?;
            print_catalogue(&catalogue);
            return Ok(());
        }
        Some(Commands::Table { records, columns, sort, cli: print_only }) => {
            if print_only {
                logging::init_stderr_logging()?;
            }

            let mut set = RecordSet::load(&records)
                .with_context(|| format!("Failed to load records from {}", records.display()))?;
            if let Some(columns) = Commands::parse_columns(&columns)? {
                set.columns = columns;
            }
            // --sort wins over a sort named in the document
            let sort = Commands::parse_sort(&sort)?.or_else(|| set.sort.clone());
            if let Some(sort) = &sort {
                if !set.columns.iter().any(|c| c.key == sort.key) {
                    pending_warning = Some(format!("Sort key '{}' is not a column, ignoring", sort.key));
                }
            }

            if print_only {
                if let Some(warning) = pending_warning {
                    warn!("{}", warning);
                }
                print_table(set, sort);
                return Ok(());
            }

            let story = TableStory::from_record_set(set, sort);
            start_story = Some(story.id().to_string());
            catalogue.insert(0, Box::new(story));
        }
        None => {}
    }

    // Logs go to a file while the TUI owns the terminal
    let _guard = logging::init_file_logging(&config.log_file)?;
    info!("Starting termblocks story browser...");
    if let Some(warning) = pending_warning {
        warn!("{}", warning);
    }

    let mut browser = StoryBrowser::new(config, catalogue);
    if let Some(id) = start_story {
        browser.open(&id)?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = browser.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("termblocks exited successfully");
        }
        Err(e) => {
            error!("termblocks encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_catalogue(catalogue: &[Box<dyn Story>]) {
    println!("{:<22} {:<6} {}", "Id", "Group", "Title");
    println!("{}", "-".repeat(60));
    for story in catalogue {
        println!(
            "{:<22} {:<6} {}",
            story.id(),
            story.group().as_str(),
            story.title()
        );
    }
}

fn print_table(set: RecordSet, sort: Option<SortState>) {
    let count = set.records.len();
    let mut table = DataTable::new(DataTableProps::new(set.records, set.columns));
    if let Some(sort) = sort {
        table = table.with_sort(sort);
    }

    println!("{}", table.to_plain_text());
    println!();
    println!("Total: {} records", count);
}
