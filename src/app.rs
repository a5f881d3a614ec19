//! Application state and event handling
//!
//! This is the core of daybar, managing:
//! - The clock, theme and quote state shown on screen
//! - Timer-driven updates (clock tick, hourly quote check, top-of-hour alignment)
//! - Event handling (keyboard input)

use crate::clock::{millis_until_next_hour, CalendarSnapshot, Clock};
use crate::config::Config;
use crate::quote::{self, CacheState, QuoteOrigin, QuoteSource, QuoteUpdate};
use crate::scheduler::{Scheduler, Task, QUOTE_CHECK_INTERVAL_MS};
use crate::storage::Storage;
use crate::types::{Quote, ThemeMode};
use crate::ui::Theme;
use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How long flash messages stay on screen
const FLASH_SECONDS: u64 = 3;

/// Main application state
pub struct App {
    // Core state
    pub should_quit: bool,
    pub config: Config,
    pub theme_mode: ThemeMode,
    pub theme: Theme,

    // Clock panel
    pub snapshot: CalendarSnapshot,

    // Quote panel (None until the first check completes)
    pub quote: Option<QuoteUpdate>,

    // Flash message (temporary feedback)
    pub flash_message: Option<(String, bool, Instant)>, // (message, is_error, timestamp)

    // Injected services
    storage: Box<dyn Storage>,
    clock: Arc<dyn Clock>,
    source: Arc<dyn QuoteSource>,

    scheduler: Scheduler,
    pending_fetch: Option<PendingFetch>,
}

/// A quote fetch running on a background thread
struct PendingFetch {
    result: Receiver<Result<Quote>>,
    started_ms: i64,
}

impl App {
    /// Create a new App instance
    pub fn new(
        config: Config,
        storage: Box<dyn Storage>,
        clock: Arc<dyn Clock>,
        source: Arc<dyn QuoteSource>,
    ) -> Self {
        let theme_mode = ThemeMode::load(storage.as_ref());
        let now = clock.now();

        debug!(theme = theme_mode.as_str(), "loaded theme preference");

        Self {
            should_quit: false,
            config,
            theme_mode,
            theme: Theme::from_mode(theme_mode),

            snapshot: CalendarSnapshot::at(now.naive_local()),
            quote: None,
            flash_message: None,

            storage,
            clock,
            source,

            scheduler: Scheduler::new(now.timestamp_millis()),
            pending_fetch: None,
        }
    }

    /// Run whatever timers are due and pick up finished fetches
    pub fn update(&mut self) {
        self.collect_fetch();

        let now = self.clock.now();
        for task in self.scheduler.due(now.timestamp_millis()) {
            match task {
                Task::Tick => self.snapshot = CalendarSnapshot::at(now.naive_local()),
                Task::QuoteCheck | Task::QuoteAlignment => {
                    debug!(?task, "quote check due");
                    self.check_quote();
                }
            }
        }

        if let Some((_, _, instant)) = &self.flash_message {
            if instant.elapsed().as_secs() >= FLASH_SECONDS {
                self.flash_message = None;
            }
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('r') => {
                if self.is_fetching() {
                    self.show_flash("Already fetching a quote", false);
                } else {
                    self.check_quote();
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Flip light/dark, re-apply the palette and persist the choice
    pub fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggled();
        self.theme = Theme::from_mode(self.theme_mode);

        match self.theme_mode.persist(self.storage.as_mut()) {
            Ok(()) => info!(theme = self.theme_mode.as_str(), "theme changed"),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "failed to save theme");
                self.show_flash("Could not save theme preference", true);
            }
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Serve the cached quote or start a background fetch
    fn check_quote(&mut self) {
        if !self.config.quotes.enabled {
            return;
        }
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();

        if let Some(pending) = &self.pending_fetch {
            let age_ms = now_ms - pending.started_ms;
            if age_ms < QUOTE_CHECK_INTERVAL_MS {
                debug!("quote fetch already in flight");
                return;
            }
            // a stalled fetch must not block the hourly retry
            warn!(age_ms, "abandoning stalled quote fetch");
            self.pending_fetch = None;
        }

        match quote::lookup(self.storage.as_ref(), now_ms) {
            CacheState::Fresh(cached) => {
                self.quote = Some(QuoteUpdate {
                    quote: cached.to_quote(),
                    origin: QuoteOrigin::Cache,
                });

                let at = now_ms + millis_until_next_hour(now.naive_local());
                self.scheduler.schedule_alignment(at);
                debug!(
                    next_check = ?self.scheduler.pending_alignment(),
                    "serving cached quote until the top of the hour"
                );
            }
            CacheState::Stale => self.start_fetch(now_ms),
        }
    }

    fn start_fetch(&mut self, now_ms: i64) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);

        thread::spawn(move || {
            // the receiver may be gone if the app quit mid-fetch
            let _ = tx.send(source.fetch());
        });

        self.pending_fetch = Some(PendingFetch { result: rx, started_ms: now_ms });
    }

    fn collect_fetch(&mut self) {
        let Some(pending) = &self.pending_fetch else {
            return;
        };

        let fetched = match pending.result.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                Err(anyhow!("quote fetch ended without a result"))
            }
        };

        self.pending_fetch = None;
        let now_ms = self.clock.now_millis();
        self.quote = Some(quote::settle(self.storage.as_mut(), fetched, now_ms));
    }

    /// Show a flash message
    fn show_flash(&mut self, message: &str, is_error: bool) {
        self.flash_message = Some((message.into(), is_error, Instant::now()));
    }
}
