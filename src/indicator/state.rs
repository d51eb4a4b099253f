//! Loading indicator state machine.
//!
//! # States
//! - Idle: nothing is shown
//! - Pending: at least one navigation is in progress, the bar grows
//! - Settling: all navigations settled, the bar completes and fades out
//!
//! # State Transitions
//! ```text
//! Idle     → Pending:  navigation starts
//! Pending  → Settling: last outstanding navigation settles (committed or discarded)
//! Settling → Idle:     fade deadline passed
//! Settling → Pending:  navigation starts again before the fade ends
//! ```
//!
//! # Design Decisions
//! - Outstanding navigations are counted, so nested navigations (a redirect
//!   issued while matching) settle the bar only once all of them settle
//! - The bar stays visible for at least `min_visible` so fast transitions
//!   do not flicker
//! - Time is passed in explicitly; the machine never reads a clock

use std::time::Duration;
use tokio::time::Instant;

use crate::config::IndicatorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Idle,
    Pending,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub min_visible: Duration,
    pub fade: Duration,
}

impl From<&IndicatorConfig> for Timings {
    fn from(config: &IndicatorConfig) -> Self {
        Self {
            min_visible: config.min_visible(),
            fade: config.fade(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&IndicatorConfig::default())
    }
}

#[derive(Debug)]
pub struct IndicatorMachine {
    timings: Timings,
    state: IndicatorState,
    active: usize,
    pending_since: Option<Instant>,
    idle_at: Option<Instant>,
}

impl IndicatorMachine {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            state: IndicatorState::Idle,
            active: 0,
            pending_since: None,
            idle_at: None,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Navigations started but not yet settled.
    pub fn active(&self) -> usize {
        self.active
    }

    /// When the current fade ends, if one is running.
    pub fn deadline(&self) -> Option<Instant> {
        self.idle_at
    }

    pub fn start(&mut self, now: Instant) {
        self.active += 1;
        if self.state != IndicatorState::Pending {
            self.state = IndicatorState::Pending;
            self.pending_since = Some(now);
            self.idle_at = None;
        }
    }

    /// A navigation committed or was discarded. Unbalanced settles are
    /// ignored.
    pub fn settle(&mut self, now: Instant) {
        if self.active == 0 {
            return;
        }
        self.active -= 1;
        if self.active > 0 || self.state != IndicatorState::Pending {
            return;
        }

        let since = self.pending_since.unwrap_or(now);
        let visible_until = (since + self.timings.min_visible).max(now);
        self.state = IndicatorState::Settling;
        self.idle_at = Some(visible_until + self.timings.fade);
    }

    /// Advance time. Returns true if the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match (self.state, self.idle_at) {
            (IndicatorState::Settling, Some(idle_at)) if now >= idle_at => {
                self.state = IndicatorState::Idle;
                self.pending_since = None;
                self.idle_at = None;
                true
            }
            _ => false,
        }
    }

    /// Bar width in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        match self.state {
            IndicatorState::Idle => 0.0,
            IndicatorState::Settling => 1.0,
            IndicatorState::Pending => {
                let since = self.pending_since.unwrap_or(now);
                let elapsed = now.saturating_duration_since(since).as_secs_f64();
                let scale = (self.timings.min_visible.as_secs_f64() * 4.0).max(0.001);
                // Creeps towards 90% but never completes on its own.
                0.9 * (1.0 - (-elapsed / scale).exp())
            }
        }
    }

    /// Bar opacity in `[0, 1]`; drops to zero over the fade window.
    pub fn opacity(&self, now: Instant) -> f64 {
        match (self.state, self.idle_at) {
            (IndicatorState::Idle, _) => 0.0,
            (IndicatorState::Settling, Some(idle_at)) => {
                let fade = self.timings.fade.as_secs_f64();
                let left = idle_at.saturating_duration_since(now).as_secs_f64();
                (left / fade).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}
