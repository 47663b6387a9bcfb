use tracing::{debug, error, warn};

use crate::backend::{ChartBackend, ChartHandle};
use crate::core::{ChartSpec, ContainerKey, ContainerRef, NodeId, TableEntry};
use crate::error::{LifecycleError, LifecycleResult};
use crate::extensions::{DisposeReason, LifecycleEvent};
use crate::host::ContainerHost;

use super::{ChartLifecycleManager, MountedChart};

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    /// Mounts a chart into `container`, or updates the one already there.
    ///
    /// Failures are logged, reported to observers and turned into `None`.
    pub fn init(
        &mut self,
        container: impl Into<ContainerRef>,
        spec: ChartSpec,
        force_create: bool,
    ) -> Option<MountedChart> {
        self.try_init(container, spec, force_create).ok()
    }

    /// Same as `init`, keeping the failure cause for callers that want it.
    ///
    /// Without `force_create`, a live chart already registered for the same
    /// node has `spec` merged into its current spec in place. Otherwise a new
    /// chart is created after disposing whatever the key held.
    pub fn try_init(
        &mut self,
        container: impl Into<ContainerRef>,
        spec: ChartSpec,
        force_create: bool,
    ) -> LifecycleResult<MountedChart> {
        let container = container.into();
        let (node, key) = match self.resolve_container(&container) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(container = %container, error = %err, "chart container not found");
                self.stats.creation_failures += 1;
                self.emit(LifecycleEvent::CreationFailed {
                    container: container.to_string(),
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        if !force_create {
            if let Some(mounted) = self.merge_in_place(&key, node, &spec)? {
                return Ok(mounted);
            }
        }

        self.create_chart(key, node, spec)
    }

    fn merge_in_place(
        &mut self,
        key: &ContainerKey,
        node: NodeId,
        patch: &ChartSpec,
    ) -> LifecycleResult<Option<MountedChart>> {
        let Some(entry) = self.table.get_mut(key.as_str()) else {
            return Ok(None);
        };
        if entry.node() != node || entry.handle().is_disposed() {
            return Ok(None);
        }

        let merged = entry.spec().merged(patch);
        if let Err(err) = entry.handle.apply_spec(&merged) {
            error!(key = %key, error = %err, "failed to apply spec to existing chart");
            self.stats.update_failures += 1;
            return Err(err);
        }
        entry.spec = merged;
        let instance_id = entry.instance_id();

        self.stats.updated += 1;
        debug!(key = %key, instance = %instance_id, "existing chart updated in place");
        self.emit(LifecycleEvent::Updated {
            key: key.clone(),
            instance: instance_id,
            replaced_spec: false,
        });
        Ok(Some(MountedChart {
            key: key.clone(),
            node,
            instance_id,
            created: false,
        }))
    }

    fn create_chart(
        &mut self,
        key: ContainerKey,
        node: NodeId,
        spec: ChartSpec,
    ) -> LifecycleResult<MountedChart> {
        // The stale chart must be gone before the backend mounts into the node.
        self.dispose_entry(key.as_str(), DisposeReason::Replaced);

        let effective = match &self.spec_defaults {
            Some(defaults) => spec.with_defaults(defaults),
            None => spec,
        };
        if self.config.clear_container_on_create {
            self.host.clear_contents(node);
        }

        let handle = match self.backend.create(node, &effective) {
            Ok(handle) => handle,
            Err(err) => {
                error!(key = %key, error = %err, "chart creation failed");
                if self.config.render_error_placeholder {
                    self.host
                        .show_error(node, &format!("chart rendering failed: {err}"));
                }
                self.stats.creation_failures += 1;
                self.emit(LifecycleEvent::CreationFailed {
                    container: key.to_string(),
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        Ok(self.adopt(key, node, effective, handle))
    }

    /// Registers a chart created outside the manager, disposing any chart the
    /// key already held.
    pub fn register(
        &mut self,
        container: impl Into<ContainerRef>,
        handle: B::Handle,
        spec: ChartSpec,
    ) -> LifecycleResult<MountedChart> {
        let container = container.into();
        let (node, key) = self.resolve_container(&container).inspect_err(|err| {
            warn!(container = %container, error = %err, "cannot register chart");
        })?;
        Ok(self.adopt(key, node, spec, handle))
    }

    fn adopt(
        &mut self,
        key: ContainerKey,
        node: NodeId,
        spec: ChartSpec,
        handle: B::Handle,
    ) -> MountedChart {
        let instance_id = self.next_instance_id();
        let displaced = self
            .table
            .put(key.clone(), TableEntry::new(instance_id, node, spec, handle));
        if let Some(displaced) = displaced {
            self.stats.record_disposed(DisposeReason::Replaced);
            self.emit(LifecycleEvent::Disposed {
                key: key.clone(),
                instance: displaced.instance_id(),
                reason: DisposeReason::Replaced,
            });
        }
        self.ensure_listeners();

        self.stats.created += 1;
        debug!(key = %key, instance = %instance_id, node = %node, "chart registered");
        self.emit(LifecycleEvent::Created {
            key: key.clone(),
            instance: instance_id,
            node,
        });
        MountedChart {
            key,
            node,
            instance_id,
            created: true,
        }
    }

    /// Applies `spec` to the live chart at `container`.
    ///
    /// Merges top-level keys by default; `replace` swaps the whole spec.
    /// Returns `false` when no live chart exists or the backend rejects it.
    pub fn update(
        &mut self,
        container: impl Into<ContainerRef>,
        spec: ChartSpec,
        replace: bool,
    ) -> bool {
        let container = container.into();
        match self.try_update(&container, spec, replace) {
            Ok(()) => true,
            Err(LifecycleError::NotRegistered(key)) => {
                warn!(key = %key, "update requested for container without a live chart");
                false
            }
            Err(err) => {
                error!(container = %container, error = %err, "chart update failed");
                false
            }
        }
    }

    fn try_update(
        &mut self,
        container: &ContainerRef,
        spec: ChartSpec,
        replace: bool,
    ) -> LifecycleResult<()> {
        let key = self.lookup_key(container).ok_or_else(|| {
            LifecycleError::NotRegistered(ContainerKey::new(container.to_string()))
        })?;
        let defaults = self.spec_defaults.as_ref();
        let entry = self
            .table
            .get_mut(key.as_str())
            .filter(|entry| !entry.handle().is_disposed())
            .ok_or_else(|| LifecycleError::NotRegistered(key.clone()))?;

        let next = if replace {
            match defaults {
                Some(defaults) => spec.with_defaults(defaults),
                None => spec,
            }
        } else {
            entry.spec().merged(&spec)
        };
        if let Err(err) = entry.handle.apply_spec(&next) {
            self.stats.update_failures += 1;
            return Err(err);
        }
        entry.spec = next;
        let instance_id = entry.instance_id();

        self.stats.updated += 1;
        debug!(key = %key, instance = %instance_id, replace, "chart spec updated");
        self.emit(LifecycleEvent::Updated {
            key,
            instance: instance_id,
            replaced_spec: replace,
        });
        Ok(())
    }

    /// Disposes the chart at `container`. Returns `false` when nothing was live.
    pub fn destroy(&mut self, container: impl Into<ContainerRef>) -> bool {
        let container = container.into();
        let Some(key) = self.lookup_key(&container) else {
            debug!(container = %container, "destroy on unknown container is a no-op");
            return false;
        };
        let destroyed = self.dispose_entry(key.as_str(), DisposeReason::Explicit);
        if !destroyed {
            debug!(key = %key, "destroy on absent chart is a no-op");
        }
        destroyed
    }

    /// Disposes every live chart. Returns how many were disposed.
    pub fn destroy_all(&mut self) -> usize {
        self.cancel_pending_resize();
        let drained = self.table.drain();
        let count = drained.len();
        for (key, entry) in drained {
            self.stats.record_disposed(DisposeReason::Teardown);
            self.emit(LifecycleEvent::Disposed {
                key,
                instance: entry.instance_id(),
                reason: DisposeReason::Teardown,
            });
        }
        debug!(count, "all charts disposed");
        count
    }

    /// Merges a theme patch into every live chart.
    ///
    /// Charts rejecting the patch keep their previous spec and do not stop the
    /// rest. Returns how many charts accepted it.
    pub fn apply_theme(&mut self, theme: &ChartSpec) -> usize {
        let mut themed = Vec::new();
        for (key, entry) in self.table.values_mut() {
            if entry.handle.is_disposed() {
                continue;
            }
            let next = entry.spec.merged(theme);
            match entry.handle.apply_spec(&next) {
                Ok(()) => {
                    entry.spec = next;
                    themed.push((key.clone(), entry.instance_id()));
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "chart rejected theme patch");
                    self.stats.update_failures += 1;
                }
            }
        }

        let count = themed.len();
        for (key, instance) in themed {
            self.stats.updated += 1;
            self.emit(LifecycleEvent::Updated {
                key,
                instance,
                replaced_spec: false,
            });
        }
        count
    }

    pub(super) fn dispose_entry(&mut self, key: &str, reason: DisposeReason) -> bool {
        let Some(entry) = self.table.remove(key) else {
            return false;
        };
        debug!(key, instance = %entry.instance_id(), ?reason, "chart disposed");
        self.stats.record_disposed(reason);
        self.emit(LifecycleEvent::Disposed {
            key: ContainerKey::new(key),
            instance: entry.instance_id(),
            reason,
        });
        true
    }
}
