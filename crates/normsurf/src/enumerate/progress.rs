//! Shared progress and cancellation state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug, Default)]
struct TrackerState {
    cancelled: bool,
    finished: bool,
    percent: f64,
    description: String,
    solutions: usize,
}

/// Handle shared between a running search and its observers.
///
/// Clones share the same state. A search polls `is_cancelled` between nodes
/// and stops cleanly; results found so far are still reported.
#[derive(Clone, Debug, Default)]
pub struct ProgressTracker {
    inner: Arc<Mutex<TrackerState>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        // A panicking observer must not wedge the search.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cancel(&self) {
        self.state().cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.state().cancelled
    }

    /// Percentage in `[0, 100]`.
    pub fn set_percent(&self, percent: f64) {
        self.state().percent = percent.clamp(0.0, 100.0);
    }

    pub fn percent(&self) -> f64 {
        self.state().percent
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.state().description = description.into();
    }

    pub fn description(&self) -> String {
        self.state().description.clone()
    }

    pub(crate) fn record_solution(&self) {
        self.state().solutions += 1;
    }

    /// Solutions reported so far.
    pub fn solutions(&self) -> usize {
        self.state().solutions
    }

    pub fn set_finished(&self) {
        let mut s = self.state();
        s.finished = true;
        if !s.cancelled {
            s.percent = 100.0;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state().finished
    }
}
