//! daybar - Terminal Day Dashboard
//!
//! A TUI showing a live clock with calendar progress and a quote of the hour.
//!
//! Features:
//! - 12-hour clock, long date and week number
//! - Day, week, month and year progress bars
//! - Light/dark theme, remembered between runs
//! - Quote of the hour, cached for one hour
//!
//! Usage: daybar [--once] [--ephemeral] [-v]

mod app;
mod clock;
mod config;
mod logging;
mod quote;
mod scheduler;
mod storage;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clock::{CalendarSnapshot, Clock, SystemClock};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quote::ZenQuotes;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use storage::{FileStorage, MemoryStorage, Storage};
use tracing::{error, info};

/// Command line flags
#[derive(Debug, Default)]
struct Options {
    once: bool,
    ephemeral: bool,
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("daybar {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = Options {
        once: args.iter().any(|a| a == "--once"),
        ephemeral: args.iter().any(|a| a == "--ephemeral"),
        verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
    };

    if let Err(e) = run(&options) {
        error!(error = %format!("{:#}", e), "daybar exited with an error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"daybar - Terminal Day Dashboard

USAGE:
    daybar [OPTIONS]

OPTIONS:
        --once       Print the dashboard once and exit
        --ephemeral  Do not read or write persisted state
    -v, --verbose    Debug logging
    -h, --help       Print help information
    -V, --version    Print version information

KEYBINDINGS:
    t                Toggle light/dark theme
    r                Check for a new quote
    q / Esc          Quit

FILES:
    ~/.config/daybar/config.toml
    ~/.local/share/daybar/storage.json
    ~/.local/share/daybar/daybar.log
"#
    );
}

fn run(options: &Options) -> Result<()> {
    // Load configuration
    let config = config::Config::load().context("Failed to load configuration")?;

    match logging::init(&config.logging, options.verbose) {
        Ok(path) => info!(log = %path.display(), "daybar {} starting", env!("CARGO_PKG_VERSION")),
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    let storage: Box<dyn Storage> = if options.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(FileStorage::open_default().context("Failed to open storage")?)
    };

    let clock = Arc::new(SystemClock);
    let source = Arc::new(ZenQuotes::new(
        config.quotes.endpoint.clone(),
        config.quotes.timeout(),
    ));

    if options.once {
        print_once(&config, storage, clock.as_ref(), source.as_ref());
        return Ok(());
    }

    let mut app = App::new(config, storage, clock, source);
    run_app(&mut app)
}

/// Non-interactive output for scripts and status bars
fn print_once(
    config: &config::Config,
    mut storage: Box<dyn Storage>,
    clock: &dyn Clock,
    source: &dyn quote::QuoteSource,
) {
    let now = clock.now();
    let snapshot = CalendarSnapshot::at(now.naive_local());

    println!("{}", snapshot.time);
    println!("{}", snapshot.date);
    if config.display.show_week_number {
        println!("Week {}", snapshot.week);
    }
    if config.display.show_progress {
        for (label, progress) in snapshot.progress_rows() {
            println!("{:<6}{:>7}", label, progress.label());
        }
    }
    if config.display.show_quote && config.quotes.enabled {
        let update = quote::refresh(storage.as_mut(), source, now.timestamp_millis());
        println!();
        println!("{}", update.quote.text_line());
        println!("{}", update.quote.author_line());
    }
}

fn run_app(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run main loop
    let result = main_loop(&mut terminal, app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("daybar stopped");
    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Timers and background fetches
        app.update();

        // Render UI
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Poll for events with timeout (keeps the clock ticking)
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
