//! Loading indicator subsystem.
//!
//! # Data Flow
//! ```text
//! Router (transition step 1) → LoadingIndicator::start
//! Router (commit or discard) → LoadingIndicator::settle
//!     → state.rs (IndicatorMachine)
//!     → watch channel (UI subscribes to IndicatorState)
//!
//! driver.rs (tokio task):
//!     sleep until fade deadline → LoadingIndicator::tick
//! ```
//!
//! # Design Decisions
//! - Independent of navigation generations; it only counts start/settle
//! - Every start is paired with exactly one settle, including for
//!   discarded navigations, so it never sticks in `Pending`
//! - There is no timeout: a route whose data never arrives keeps the
//!   rendering layer suspended, but the bar itself follows the controller

pub mod driver;
pub mod state;

pub use driver::IndicatorDriver;
pub use state::{IndicatorMachine, IndicatorState, Timings};

use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Notify};
use tokio::time::Instant;

struct Shared {
    machine: Mutex<IndicatorMachine>,
    state_tx: watch::Sender<IndicatorState>,
    wake: Notify,
}

/// Shared handle to the loading bar.
#[derive(Clone)]
pub struct LoadingIndicator {
    inner: Arc<Shared>,
}

impl LoadingIndicator {
    pub fn new(timings: Timings) -> Self {
        let (state_tx, _) = watch::channel(IndicatorState::Idle);
        Self {
            inner: Arc::new(Shared {
                machine: Mutex::new(IndicatorMachine::new(timings)),
                state_tx,
                wake: Notify::new(),
            }),
        }
    }

    pub fn start(&self) {
        self.update(|m, now| m.start(now));
    }

    pub fn settle(&self) {
        self.update(|m, now| m.settle(now));
    }

    /// Apply elapsed time. The driver calls this; UIs without a tokio
    /// runtime can call it from their own frame loop.
    pub fn tick(&self) {
        self.update(|m, now| {
            m.tick(now);
        });
    }

    pub fn state(&self) -> IndicatorState {
        self.lock().state()
    }

    /// Bar width for the UI to draw, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.lock().progress(Instant::now())
    }

    pub fn opacity(&self) -> f64 {
        self.lock().opacity(Instant::now())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.lock().deadline()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<IndicatorState> {
        self.inner.state_tx.subscribe()
    }

    pub(crate) async fn changed(&self) {
        self.inner.wake.notified().await;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndicatorMachine> {
        self.inner.machine.lock().expect("indicator mutex poisoned")
    }

    fn update(&self, f: impl FnOnce(&mut IndicatorMachine, Instant)) {
        let state = {
            let mut machine = self.lock();
            f(&mut machine, Instant::now());
            machine.state()
        };

        let changed = self.inner.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            tracing::trace!(state = ?state, "Loading indicator changed");
        }
        self.inner.wake.notify_one();
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}
