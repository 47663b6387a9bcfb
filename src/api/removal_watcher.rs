use smallvec::SmallVec;
use tracing::debug;

use crate::backend::ChartBackend;
use crate::core::ContainerKey;
use crate::extensions::{DisposeReason, LifecycleEvent};
use crate::host::{ContainerHost, MutationBatch};

use super::ChartLifecycleManager;

/// Host-wide mutation observer state.
#[derive(Debug, Default)]
pub(crate) struct RemovalWatcher {
    installed: bool,
}

impl RemovalWatcher {
    pub(crate) fn install(&mut self, host: &mut impl ContainerHost) {
        if self.installed {
            return;
        }
        host.subscribe_mutations();
        self.installed = true;
        debug!("mutation observer installed");
    }
}

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    #[must_use]
    pub fn mutation_observer_installed(&self) -> bool {
        self.watcher.installed
    }

    /// Processes one batch of document mutations.
    ///
    /// Batches without removals are ignored. Otherwise every live chart whose
    /// registered node is no longer attached is disposed. Returns the keys
    /// that were cleaned up.
    pub fn handle_mutations(&mut self, batch: &MutationBatch) -> Vec<ContainerKey> {
        if !batch.has_removals() || self.table.is_empty() {
            return Vec::new();
        }
        debug!(
            removed_roots = batch.removed.len(),
            live = self.table.len(),
            "checking live charts against removed subtrees"
        );
        self.sweep_detached()
    }

    /// Disposes every chart whose container node left the document.
    ///
    /// Liveness is checked on the node captured at registration, so a new
    /// container that reuses an old element id keeps its own chart.
    pub fn sweep_detached(&mut self) -> Vec<ContainerKey> {
        let detached: SmallVec<[ContainerKey; 4]> = self
            .table
            .values()
            .filter(|(_, entry)| !self.host.is_attached(entry.node()))
            .map(|(key, _)| key.clone())
            .collect();

        let mut cleaned = Vec::with_capacity(detached.len());
        for key in detached {
            let Some(entry) = self.table.remove(key.as_str()) else {
                continue;
            };
            debug!(
                key = %key,
                instance = %entry.instance_id(),
                "container detached, chart disposed"
            );
            self.stats.record_disposed(DisposeReason::Detached);
            self.emit(LifecycleEvent::Disposed {
                key: key.clone(),
                instance: entry.instance_id(),
                reason: DisposeReason::Detached,
            });
            cleaned.push(key);
        }
        cleaned
    }
}
