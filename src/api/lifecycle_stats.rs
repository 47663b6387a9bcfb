use serde::{Deserialize, Serialize};

use crate::extensions::DisposeReason;

/// Counters describing chart churn since the manager was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifecycleStats {
    pub created: u64,
    pub updated: u64,
    pub creation_failures: u64,
    pub update_failures: u64,
    pub disposed_explicit: u64,
    pub disposed_replaced: u64,
    pub disposed_detached: u64,
    pub disposed_teardown: u64,
    pub resize_passes: u64,
    pub resize_failures: u64,
    /// Resize notifications absorbed by the debounce window.
    pub resize_triggers_coalesced: u64,
}

impl LifecycleStats {
    #[must_use]
    pub fn disposed_total(&self) -> u64 {
        self.disposed_explicit
            + self.disposed_replaced
            + self.disposed_detached
            + self.disposed_teardown
    }

    pub(super) fn record_disposed(&mut self, reason: DisposeReason) {
        match reason {
            DisposeReason::Explicit => self.disposed_explicit += 1,
            DisposeReason::Replaced => self.disposed_replaced += 1,
            DisposeReason::Detached => self.disposed_detached += 1,
            DisposeReason::Teardown => self.disposed_teardown += 1,
        }
    }
}
