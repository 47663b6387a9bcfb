use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::backend::ChartBackend;
use crate::core::{ChartSpec, ContainerKey, InstanceId, InstanceTable, NodeId};
use crate::error::LifecycleResult;
use crate::extensions::{LifecycleEvent, LifecycleObserver};
use crate::host::ContainerHost;

use super::{LifecycleConfig, LifecycleStats, RemovalWatcher, ResizeBroadcaster};

/// Result of a successful `init`/`register` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountedChart {
    pub key: ContainerKey,
    pub node: NodeId,
    pub instance_id: InstanceId,
    /// `false` when an existing chart was updated in place.
    pub created: bool,
}

/// Owner of every live chart in one host document.
///
/// All access to the instance table goes through this type. It is constructed
/// explicitly by the application root and lives as long as the dashboard.
/// Dropping it disposes every remaining chart.
pub struct ChartLifecycleManager<B: ChartBackend, H: ContainerHost> {
    pub(super) backend: B,
    pub(super) host: H,
    pub(super) config: LifecycleConfig,
    pub(super) spec_defaults: Option<ChartSpec>,
    pub(super) table: InstanceTable<B::Handle>,
    pub(super) resize: ResizeBroadcaster,
    pub(super) watcher: RemovalWatcher,
    pub(super) observers: IndexMap<String, Box<dyn LifecycleObserver>>,
    pub(super) stats: LifecycleStats,
    next_instance: u64,
    next_auto_id: u64,
}

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    pub fn new(backend: B, host: H, config: LifecycleConfig) -> LifecycleResult<Self> {
        config.validate()?;
        let spec_defaults = config.spec_defaults_spec()?;
        let resize = ResizeBroadcaster::new(config.resize_debounce());

        Ok(Self {
            backend,
            host,
            config,
            spec_defaults,
            table: InstanceTable::new(),
            resize,
            watcher: RemovalWatcher::default(),
            observers: IndexMap::new(),
            stats: LifecycleStats::default(),
            next_instance: 0,
            next_auto_id: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for structural changes (mounting, removing nodes).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<ContainerKey> {
        self.table.keys().cloned().collect()
    }

    #[must_use]
    pub fn instance(&self, key: &str) -> Option<&B::Handle> {
        self.table.get(key).map(|entry| entry.handle())
    }

    #[must_use]
    pub fn instance_id(&self, key: &str) -> Option<InstanceId> {
        self.table.get(key).map(|entry| entry.instance_id())
    }

    /// Last successfully applied spec for `key`.
    #[must_use]
    pub fn spec(&self, key: &str) -> Option<&ChartSpec> {
        self.table.get(key).map(|entry| entry.spec())
    }

    #[must_use]
    pub fn stats(&self) -> LifecycleStats {
        LifecycleStats {
            resize_triggers_coalesced: self.resize.coalesced(),
            ..self.stats
        }
    }

    pub(super) fn next_instance_id(&mut self) -> InstanceId {
        self.next_instance += 1;
        InstanceId::from_raw(self.next_instance)
    }

    /// Generates an element id unused by both the host and the table.
    pub(super) fn next_auto_container_id(&mut self) -> String {
        loop {
            self.next_auto_id += 1;
            let candidate = format!("{}-{}", self.config.auto_id_prefix, self.next_auto_id);
            if self.host.element_by_id(&candidate).is_none() && !self.table.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Installs the host-wide listeners on first registration only.
    pub(super) fn ensure_listeners(&mut self) {
        self.resize.install(&mut self.host);
        self.watcher.install(&mut self.host);
    }

    pub(super) fn emit(&mut self, event: LifecycleEvent) {
        for observer in self.observers.values_mut() {
            observer.on_event(&event);
        }
    }
}

impl<B: ChartBackend, H: ContainerHost> Drop for ChartLifecycleManager<B, H> {
    fn drop(&mut self) {
        if !self.table.is_empty() {
            self.destroy_all();
        }
    }
}
