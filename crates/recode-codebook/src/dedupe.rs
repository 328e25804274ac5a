//! Once-per-message warning dedupe.
//!
//! Translation misses tend to repeat for every row of a column, so each
//! distinct message is emitted at most once per run. The tracker is an
//! explicit context object shared by the codebooks and registries of one
//! run, keeping runs and tests independent of each other.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct WarnDedupe {
    seen: Arc<Mutex<BTreeSet<String>>>,
}

impl WarnDedupe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the message as a warning unless it was already emitted.
    pub fn warn_once(&self, message: &str) {
        let mut seen = match self.seen.lock() {
            Ok(seen) => seen,
            Err(poisoned) => poisoned.into_inner(),
        };
        if seen.insert(message.to_string()) {
            warn!("{message}");
        }
    }

    /// Number of distinct messages emitted so far.
    pub fn distinct_count(&self) -> usize {
        match self.seen.lock() {
            Ok(seen) => seen.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WarnDedupe;

    #[test]
    fn counts_each_message_once() {
        let warnings = WarnDedupe::new();
        warnings.warn_once("a");
        warnings.warn_once("a");
        warnings.warn_once("b");
        assert_eq!(warnings.distinct_count(), 2);
    }

    #[test]
    fn clones_share_state() {
        let warnings = WarnDedupe::new();
        let shared = warnings.clone();
        shared.warn_once("a");
        warnings.warn_once("a");
        assert_eq!(warnings.distinct_count(), 1);
    }
}
