//! Presentation-only timers: the header clock and the footer status line.
//!
//! Neither touches selection state. Both have an explicit start/stop lifecycle tied to the
//! owning view.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom as _};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);
pub const STATUS_PERIOD: Duration = Duration::from_secs(4);

pub const INITIAL_STATUS: &str = "INITIALIZING_SUBSYSTEMS...";
pub const STATUS_MESSAGES: [&str; 7] = [
    "FETCHING_ARCHIVE_DATA...",
    "DECRYPTING_SECTOR_09...",
    "BUFFERING_VISUAL_ASSETS...",
    "SYSTEM_NOMINAL_100%",
    "ENCRYPTED_HANDSHAKE_OK",
    "UPDATING_RECORD_INDEX...",
    "SCANNING_PHYSICAL_MEDIA...",
];

/// A fixed-period timer polled from the UI loop.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Option<Instant>,
}
impl PeriodicTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns whether the timer fired. Fires at most once per call; missed periods are
    /// dropped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.period;
        self.next_due = Some(if next <= now { now + self.period } else { next });
        true
    }
}

/// Which timers fired during a [`Ticker::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvents {
    pub clock: bool,
    pub status: bool,
}

pub struct Ticker {
    clock: PeriodicTimer,
    status: PeriodicTimer,
    time: DateTime<Local>,
    status_text: &'static str,
    rng: StdRng,
}
impl Ticker {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A ticker whose status sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            clock: PeriodicTimer::new(CLOCK_PERIOD),
            status: PeriodicTimer::new(STATUS_PERIOD),
            time: Local::now(),
            status_text: INITIAL_STATUS,
            rng,
        }
    }

    pub fn start(&mut self, now: Instant) {
        tracing::debug!("ticker started");
        self.time = Local::now();
        self.clock.start(now);
        self.status.start(now);
    }

    pub fn stop(&mut self) {
        tracing::debug!("ticker stopped");
        self.clock.stop();
        self.status.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running() || self.status.is_running()
    }

    pub fn poll(&mut self, now: Instant) -> TickEvents {
        let events = TickEvents {
            clock: self.clock.poll(now),
            status: self.status.poll(now),
        };
        if events.clock {
            self.time = Local::now();
        }
        if events.status
            && let Some(text) = STATUS_MESSAGES.choose(&mut self.rng)
        {
            self.status_text = *text;
        }
        events
    }

    pub fn status_text(&self) -> &'static str {
        self.status_text
    }

    pub fn clock_text(&self) -> String {
        format_clock(&self.time)
    }

    pub fn date_text(&self) -> String {
        format_date(&self.time)
    }
}
impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("clock", &self.clock)
            .field("status", &self.status)
            .field("time", &self.time)
            .field("status_text", &self.status_text)
            .finish_non_exhaustive()
    }
}

/// `HH:MM:SS`, 24-hour.
pub fn format_clock<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M:%S").to_string()
}

/// `DD MON YYYY`, e.g. `07 MAR 2024`.
pub fn format_date<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%d %b %Y").to_string().to_uppercase()
}
