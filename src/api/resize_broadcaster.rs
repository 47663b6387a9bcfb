use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::backend::{ChartBackend, ChartHandle};
use crate::core::{ContainerKey, Debouncer};
use crate::extensions::LifecycleEvent;
use crate::host::ContainerHost;

use super::ChartLifecycleManager;

/// Outcome of one resize pass over the live charts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeReport {
    pub resized: usize,
    /// Charts still in the table whose handle already reports disposed.
    pub skipped: usize,
    pub failed: SmallVec<[ContainerKey; 4]>,
}

/// Host-wide resize listener state plus its debounce window.
#[derive(Debug)]
pub(crate) struct ResizeBroadcaster {
    installed: bool,
    debouncer: Debouncer,
}

impl ResizeBroadcaster {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            installed: false,
            debouncer: Debouncer::new(delay),
        }
    }

    pub(crate) fn install(&mut self, host: &mut impl ContainerHost) {
        if self.installed {
            return;
        }
        host.subscribe_resize();
        self.installed = true;
        debug!("resize listener installed");
    }

    pub(crate) fn coalesced(&self) -> u64 {
        self.debouncer.coalesced()
    }
}

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    /// Feeds one host resize notification into the debounce window.
    ///
    /// Notifications arriving before the first chart installed the listener
    /// are dropped. Returns whether the notification was accepted.
    pub fn notify_resize(&mut self, now: Instant) -> bool {
        if !self.resize.installed {
            trace!("resize notification before listener install ignored");
            return false;
        }
        self.resize.debouncer.trigger(now);
        true
    }

    /// When the pending resize burst settles, if any.
    #[must_use]
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.debouncer.deadline()
    }

    #[must_use]
    pub fn resize_listener_installed(&self) -> bool {
        self.resize.installed
    }

    /// Runs a resize pass once the burst has settled; otherwise returns `None`.
    pub fn poll_resize(&mut self, now: Instant) -> Option<ResizeReport> {
        if !self.resize.debouncer.poll(now) {
            return None;
        }
        Some(self.run_resize_pass())
    }

    /// Resizes every live chart immediately. One failing chart never blocks the rest.
    pub fn run_resize_pass(&mut self) -> ResizeReport {
        let mut report = ResizeReport::default();
        for (key, entry) in self.table.values_mut() {
            if entry.handle.is_disposed() {
                report.skipped += 1;
                continue;
            }
            match entry.handle.resize() {
                Ok(()) => report.resized += 1,
                Err(err) => {
                    warn!(key = %key, error = %err, "chart resize failed");
                    report.failed.push(key.clone());
                }
            }
        }

        self.stats.resize_passes += 1;
        self.stats.resize_failures += report.failed.len() as u64;
        debug!(
            resized = report.resized,
            skipped = report.skipped,
            failed = report.failed.len(),
            "resize pass finished"
        );
        self.emit(LifecycleEvent::ResizePass {
            resized: report.resized,
            failed: report.failed.len(),
        });
        report
    }

    pub(super) fn cancel_pending_resize(&mut self) {
        self.resize.debouncer.cancel();
    }
}
