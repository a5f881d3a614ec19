//! Timer table for the dashboard's periodic work
//!
//! Time is passed in as epoch milliseconds, so the table can be driven by
//! the real clock in the main loop or stepped manually in tests.

use crate::quote::CACHE_TTL_MS;

/// Clock panel refresh interval
pub const TICK_INTERVAL_MS: i64 = 1_000;

/// Quote re-check interval
pub const QUOTE_CHECK_INTERVAL_MS: i64 = CACHE_TTL_MS;

/// Work the scheduler can hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Recompute the clock and calendar
    Tick,
    /// Hourly quote check, counted from start-up
    QuoteCheck,
    /// One-shot quote check at the top of the hour
    QuoteAlignment,
}

#[derive(Debug, Clone, Copy)]
struct Repeating {
    next_due: i64,
    interval: i64,
}

impl Repeating {
    fn starting_at(now_ms: i64, interval: i64) -> Self {
        Self { next_due: now_ms, interval }
    }

    /// Fires at most once per call; a timer that fell behind skips the
    /// slots it missed instead of bursting.
    fn poll(&mut self, now_ms: i64) -> bool {
        if now_ms < self.next_due {
            return false;
        }
        let missed = (now_ms - self.next_due) / self.interval;
        self.next_due += (missed + 1) * self.interval;
        true
    }
}

/// The three dashboard timers
#[derive(Debug, Clone)]
pub struct Scheduler {
    tick: Repeating,
    quote_check: Repeating,
    alignment: Option<i64>,
}

impl Scheduler {
    /// Both repeating tasks are due immediately
    pub fn new(now_ms: i64) -> Self {
        Self {
            tick: Repeating::starting_at(now_ms, TICK_INTERVAL_MS),
            quote_check: Repeating::starting_at(now_ms, QUOTE_CHECK_INTERVAL_MS),
            alignment: None,
        }
    }

    /// Arm the one-shot quote check, replacing any pending one
    pub fn schedule_alignment(&mut self, at_ms: i64) {
        self.alignment = Some(at_ms);
    }

    pub fn pending_alignment(&self) -> Option<i64> {
        self.alignment
    }

    /// Tasks due at `now_ms`, each reported once
    pub fn due(&mut self, now_ms: i64) -> Vec<Task> {
        let mut tasks = Vec::new();

        if self.tick.poll(now_ms) {
            tasks.push(Task::Tick);
        }
        if self.quote_check.poll(now_ms) {
            tasks.push(Task::QuoteCheck);
        }
        if let Some(at) = self.alignment {
            if now_ms >= at {
                self.alignment = None;
                tasks.push(Task::QuoteAlignment);
            }
        }

        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_700_000_000_000;

    #[test]
    fn test_everything_due_at_start() {
        let mut scheduler = Scheduler::new(START);
        assert_eq!(scheduler.due(START), vec![Task::Tick, Task::QuoteCheck]);
        assert!(scheduler.due(START).is_empty());
    }

    #[test]
    fn test_tick_every_second() {
        let mut scheduler = Scheduler::new(START);
        scheduler.due(START);

        assert!(scheduler.due(START + 999).is_empty());
        assert_eq!(scheduler.due(START + 1_000), vec![Task::Tick]);
        assert_eq!(scheduler.due(START + 2_050), vec![Task::Tick]);
        assert!(scheduler.due(START + 2_999).is_empty());
    }

    #[test]
    fn test_late_tick_does_not_burst() {
        let mut scheduler = Scheduler::new(START);
        scheduler.due(START);

        assert_eq!(scheduler.due(START + 5_500), vec![Task::Tick]);
        assert!(scheduler.due(START + 5_600).is_empty());
        assert_eq!(scheduler.due(START + 6_000), vec![Task::Tick]);
    }

    #[test]
    fn test_hourly_quote_check() {
        let mut scheduler = Scheduler::new(START);
        scheduler.due(START);

        let tasks = scheduler.due(START + QUOTE_CHECK_INTERVAL_MS);
        assert!(tasks.contains(&Task::QuoteCheck));
    }

    #[test]
    fn test_alignment_is_one_shot() {
        let mut scheduler = Scheduler::new(START);
        scheduler.due(START);
        scheduler.schedule_alignment(START + 10_500);

        assert!(!scheduler.due(START + 10_000).contains(&Task::QuoteAlignment));
        assert!(scheduler.due(START + 10_500).contains(&Task::QuoteAlignment));
        assert_eq!(scheduler.pending_alignment(), None);
        assert!(!scheduler.due(START + 20_000).contains(&Task::QuoteAlignment));
    }

    #[test]
    fn test_alignment_rescheduling_replaces() {
        let mut scheduler = Scheduler::new(START);
        scheduler.schedule_alignment(START + 5_000);
        scheduler.schedule_alignment(START + 9_000);
        assert_eq!(scheduler.pending_alignment(), Some(START + 9_000));
    }
}
