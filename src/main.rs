//! gridentry - terminal host for the grid data-entry engine.
//!
//! Opens a grid (JSON or CSV) or a blank one, and lets the user navigate,
//! edit and save it from the keyboard or mouse. All grid behavior lives in
//! the library; this binary only draws it and forwards terminal events.

use clap::Parser;
use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gridentry::application::GridController;
use gridentry::infrastructure::{logging, FileRepository};
use gridentry::presentation::{render_ui, Args, Host, InputHandler};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

/// Entry point for the gridentry terminal application.
///
/// # Errors
///
/// Returns an error if the configuration or grid file cannot be read, the
/// initial grid is not rectangular, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init();

    let config = args.to_config()?;
    let controller = GridController::new(config)?;

    if let Some(path) = &args.export_csv {
        FileRepository::export_csv(controller.grid(), path)?;
        println!("Exported to {}", path.display());
        return Ok(());
    }

    let mut host = Host::new(controller, args.save_path());
    tracing::info!(target: "host", path = %host.save_path.display(), "starting terminal host");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut host);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(target: "host", error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}

/// Draws the host and forwards terminal events until the user quits.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, host: &mut Host) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, host))?;

        InputHandler::handle_event(host, event::read()?);
        if host.should_quit {
            return Ok(());
        }
    }
}
