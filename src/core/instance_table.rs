use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::backend::ChartHandle;

use super::{ChartSpec, ContainerKey, NodeId};

/// Monotonic id of one created chart instance, unique per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// One live chart: its handle plus the node identity captured at registration.
#[derive(Debug)]
pub struct TableEntry<H> {
    pub(crate) instance_id: InstanceId,
    pub(crate) node: NodeId,
    pub(crate) spec: ChartSpec,
    pub(crate) handle: H,
}

impl<H: ChartHandle> TableEntry<H> {
    #[must_use]
    pub fn new(instance_id: InstanceId, node: NodeId, spec: ChartSpec, handle: H) -> Self {
        Self {
            instance_id,
            node,
            spec,
            handle,
        }
    }

    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub(crate) fn dispose(&mut self) {
        if !self.handle.is_disposed() {
            self.handle.dispose();
        }
    }
}

/// Container key to live chart mapping.
///
/// Iteration follows registration order so resize passes and teardown are
/// deterministic. Every entry leaving the table is disposed on the way out.
#[derive(Debug)]
pub struct InstanceTable<H> {
    entries: IndexMap<ContainerKey, TableEntry<H>>,
}

impl<H> Default for InstanceTable<H> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<H: ChartHandle> InstanceTable<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TableEntry<H>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TableEntry<H>> {
        self.entries.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `entry`, disposing and returning any entry previously at `key`.
    ///
    /// The replacement keeps the key's original registration slot.
    pub fn put(&mut self, key: ContainerKey, entry: TableEntry<H>) -> Option<TableEntry<H>> {
        if let Some(existing) = self.entries.get_mut(&key) {
            existing.dispose();
            return Some(std::mem::replace(existing, entry));
        }
        self.entries.insert(key, entry);
        None
    }

    /// Disposes and removes the entry at `key`. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<TableEntry<H>> {
        let mut entry = self.entries.shift_remove(key)?;
        entry.dispose();
        Some(entry)
    }

    /// Live entries, recomputed from current state on every call.
    pub fn values(&self) -> impl Iterator<Item = (&ContainerKey, &TableEntry<H>)> {
        self.entries.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = (&ContainerKey, &mut TableEntry<H>)> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ContainerKey> {
        self.entries.keys()
    }

    /// Disposes every entry and empties the table.
    pub fn drain(&mut self) -> Vec<(ContainerKey, TableEntry<H>)> {
        self.entries
            .drain(..)
            .map(|(key, mut entry)| {
                entry.dispose();
                (key, entry)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
