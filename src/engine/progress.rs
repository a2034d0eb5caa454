//! Module for the live progress indicator of a run.

use std::sync::{Mutex, PoisonError};

/// Snapshot of a run's progress, handed to the progress observer.
///
/// `current_shop` and `current_carrier` belong to the most recently completed carrier group.
/// With several groups in flight they are a display hint only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub processed: usize,
    pub total: usize,
    pub current_shop: String,
    pub current_carrier: String,
}

pub(crate) struct ProgressTracker<'a> {
    state: Mutex<ProgressState>,
    observer: &'a (dyn Fn(&ProgressState) + Sync),
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(total: usize, observer: &'a (dyn Fn(&ProgressState) + Sync)) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                total,
                ..ProgressState::default()
            }),
            observer,
        }
    }

    /// Counts `by` more orders as processed and notifies the observer.
    pub(crate) fn advance(&self, by: usize, shop: &str, carrier: &str) {
        let snapshot = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.processed += by;
            debug_assert!(
                state.processed <= state.total,
                "internal logic error: more orders processed than submitted"
            );
            state.current_shop = shop.to_string();
            state.current_carrier = carrier.to_string();
            state.clone()
        };
        (self.observer)(&snapshot);
    }

    pub(crate) fn snapshot(&self) -> ProgressState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
