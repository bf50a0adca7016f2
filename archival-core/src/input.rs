//! Normalises raw wheel and key input into navigation intents.
//!
//! Wheel input arrives in bursts (inertial scrolling, trackpad jitter), so it is filtered by a
//! noise threshold and a cooldown. Key presses are discrete and only gated on the lightbox.

use std::time::{Duration, Instant};

use archival_state::RecordId;

use crate::config::NavigationConfig;

/// A normalised directive for the selection state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Step to the next record.
    Advance,
    /// Step to the previous record.
    Retreat,
    /// Leave focused mode.
    Dismiss,
    /// Select a record, or deselect it if it is already active.
    Toggle(RecordId),
}

/// The navigation keys the workstation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// Snapshot of the state that decides whether input is accepted at all.
///
/// Passed in on every call rather than captured, so the debouncer can never act on a stale view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputGate {
    pub focused: bool,
    pub lightbox_open: bool,
}

#[derive(Debug, Clone)]
pub struct InputDebouncer {
    cooldown: Duration,
    noise_threshold: f32,
    last_advance: Option<Instant>,
}
impl InputDebouncer {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            cooldown: config.scroll_cooldown(),
            noise_threshold: config.wheel_noise_threshold,
            last_advance: None,
        }
    }

    /// When the last wheel event was accepted, if ever.
    pub fn last_advance(&self) -> Option<Instant> {
        self.last_advance
    }

    /// Filters a wheel event. Only accepted events move the debounce clock.
    pub fn wheel(&mut self, delta_y: f32, now: Instant, gate: InputGate) -> Option<Intent> {
        if gate.lightbox_open || gate.focused {
            tracing::trace!("wheel ignored: gated ({gate:?})");
            return None;
        }
        // Written this way round so NaN is rejected too.
        if !(delta_y.abs() >= self.noise_threshold) {
            tracing::trace!("wheel ignored: delta {delta_y} below noise threshold");
            return None;
        }
        if let Some(last) = self.last_advance
            && now.saturating_duration_since(last) < self.cooldown
        {
            tracing::trace!("wheel ignored: within cooldown");
            return None;
        }

        self.last_advance = Some(now);
        Some(if delta_y > 0.0 {
            Intent::Advance
        } else {
            Intent::Retreat
        })
    }

    /// Maps a key press to an intent. Keys are never rate limited.
    pub fn key(&self, key: Key, gate: InputGate) -> Option<Intent> {
        if gate.lightbox_open {
            return None;
        }
        Some(match key {
            Key::ArrowDown | Key::ArrowRight => Intent::Advance,
            Key::ArrowUp | Key::ArrowLeft => Intent::Retreat,
            Key::Escape => Intent::Dismiss,
        })
    }
}
impl Default for InputDebouncer {
    fn default() -> Self {
        Self::new(&NavigationConfig::default())
    }
}
