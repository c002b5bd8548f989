//! Terminal UI for browsing the catalog
//!
//! Search bar (debounced live search), filter sidebar, stable-sorted
//! product table, status bar and transient cart notifications. The UI
//! only applies the engine's visibility/order decisions; it never
//! decides them itself.

pub mod app;
pub mod colors;
pub mod filters;
pub mod search;
pub mod table;
pub mod ui;

pub use app::{App, BrowseConfig};

use crate::catalog::Catalog;
use crate::error::Result;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;

/// Run the interactive browser over a loaded catalog
pub fn run(catalog: Catalog, config: BrowseConfig) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog, config);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
