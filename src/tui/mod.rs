//! Interactive name picker

mod app;
mod ui;

use crate::index::SubstringIndex;
use crate::query::SearchOptions;
use anyhow::Result;
use app::{Action, App};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Run the picker over `index`. Returns the name chosen with Enter, if any.
pub fn run(
    index: SubstringIndex,
    options: SearchOptions,
    initial_query: Option<String>,
) -> Result<Option<String>> {
    let mut app = App::new(index, options);
    if let Some(query) = initial_query {
        app.set_query(&query);
    }

    // Drawn on stderr so stdout only carries the picked name
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    debug!(remaining = app.index().len(), "picker closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
) -> Result<Option<String>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        // Only handle key press events, not release or repeat
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::Continue => {}
            Action::Quit => return Ok(None),
            Action::Pick(name) => return Ok(Some(name)),
        }
    }
}
