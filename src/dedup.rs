//! Registry of place ids already returned by place search
//!
//! Search results across cities and categories are filtered against this
//! set so a place is only offered once per planning session. The registry
//! is owned by whoever serves the session and can be reset explicitly.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// Thread-safe set of seen place ids
#[derive(Debug, Default)]
pub struct SeenPlaces {
    ids: Mutex<HashSet<String>>,
}

impl SeenPlaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `place_id` and report whether it had been seen already.
    ///
    /// An empty id is always treated as a duplicate.
    pub fn is_duplicate(&self, place_id: &str) -> bool {
        if place_id.is_empty() {
            return true;
        }
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        !ids.insert(place_id.to_string())
    }

    /// Forget every registered id
    pub fn reset(&self) {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(cleared = ids.len(), "resetting seen place ids");
        ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
