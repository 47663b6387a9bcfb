use indexmap::IndexMap;

use crate::core::NodeId;
use crate::error::{LifecycleError, LifecycleResult};

use super::{ContainerHost, MutationBatch};

#[derive(Debug, Default)]
struct Element {
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    placeholder: Option<String>,
    clear_count: u32,
}

/// In-memory document tree with a single `body` root.
///
/// Structural changes made through `append_child`/`remove` are queued and
/// handed out by `take_mutations`, mirroring how a mutation observer delivers
/// records in batches after the fact.
///
/// Removed subtrees stay addressable until `prune_detached` drops them, so a
/// node can still be moved back before its removal record is handled.
#[derive(Debug)]
pub struct MemoryDocument {
    body: NodeId,
    elements: IndexMap<NodeId, Element>,
    next_node: u64,
    pending: MutationBatch,
    delivered_removals: Vec<NodeId>,
    resize_subscriptions: u32,
    mutation_subscriptions: u32,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        let body = NodeId::from_raw(0);
        let mut elements = IndexMap::new();
        elements.insert(body, Element::default());
        Self {
            body,
            elements,
            next_node: 1,
            pending: MutationBatch::default(),
            delivered_removals: Vec::new(),
            resize_subscriptions: 0,
            mutation_subscriptions: 0,
        }
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, id: Option<&str>) -> NodeId {
        let node = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        self.elements.insert(
            node,
            Element {
                id: id.map(str::to_owned),
                ..Element::default()
            },
        );
        node
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> LifecycleResult<()> {
        if !self.elements.contains_key(&parent) {
            return Err(LifecycleError::InvalidData(format!(
                "unknown parent {parent}"
            )));
        }
        if !self.elements.contains_key(&child) || child == self.body {
            return Err(LifecycleError::InvalidData(format!(
                "cannot append {child}"
            )));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(LifecycleError::InvalidData(format!(
                "appending {child} under {parent} would create a cycle"
            )));
        }

        self.detach(child);
        if let Some(element) = self.elements.get_mut(&child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.elements.get_mut(&parent) {
            element.children.push(child);
        }
        if self.is_attached(child) {
            self.pending.added.push(child);
        }
        Ok(())
    }

    /// Creates an element with `id` and appends it under `parent`.
    pub fn mount_element(&mut self, parent: NodeId, id: Option<&str>) -> LifecycleResult<NodeId> {
        let node = self.create_element(id);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Detaches `node` and its subtree. Returns `false` when it was not attached.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.body || !self.is_attached(node) {
            return false;
        }
        self.detach(node);
        self.pending.removed.push(node);
        true
    }

    /// Hands out the queued mutation records.
    pub fn take_mutations(&mut self) -> MutationBatch {
        let batch = std::mem::take(&mut self.pending);
        self.delivered_removals.extend_from_slice(&batch.removed);
        batch
    }

    /// Drops removed subtrees whose records were already handed out and that
    /// were not re-attached since. Returns how many elements were freed.
    ///
    /// Call it after the lifecycle manager processed the batch.
    pub fn prune_detached(&mut self) -> usize {
        let mut freed = 0;
        for root in std::mem::take(&mut self.delivered_removals) {
            if !self.elements.contains_key(&root) || self.is_attached(root) {
                continue;
            }
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                if let Some(element) = self.elements.shift_remove(&node) {
                    stack.extend(element.children);
                    freed += 1;
                }
            }
        }
        freed
    }

    /// Elements currently held, attached or not.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn placeholder(&self, node: NodeId) -> Option<&str> {
        self.elements
            .get(&node)
            .and_then(|element| element.placeholder.as_deref())
    }

    #[must_use]
    pub fn clear_count(&self, node: NodeId) -> u32 {
        self.elements
            .get(&node)
            .map_or(0, |element| element.clear_count)
    }

    #[must_use]
    pub fn resize_subscriptions(&self) -> u32 {
        self.resize_subscriptions
    }

    #[must_use]
    pub fn mutation_subscriptions(&self) -> u32 {
        self.mutation_subscriptions
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.elements.get_mut(&node).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.retain(|child| *child != node);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|element| element.parent);
        }
        false
    }
}

impl ContainerHost for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .rev()
            .filter(|(_, element)| element.id.as_deref() == Some(id))
            .map(|(node, _)| *node)
            .find(|node| self.is_attached(*node))
    }

    fn element_id(&self, node: NodeId) -> Option<String> {
        self.elements.get(&node).and_then(|element| element.id.clone())
    }

    fn assign_element_id(&mut self, node: NodeId, id: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.id = Some(id.to_owned());
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.elements.contains_key(&node) && self.is_ancestor_or_self(self.body, node)
    }

    fn clear_contents(&mut self, node: NodeId) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.placeholder = None;
            element.clear_count += 1;
        }
    }

    fn show_error(&mut self, node: NodeId, message: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.placeholder = Some(message.to_owned());
        }
    }

    fn subscribe_resize(&mut self) {
        self.resize_subscriptions += 1;
    }

    fn subscribe_mutations(&mut self) {
        self.mutation_subscriptions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestor_removal_detaches_descendants() {
        let mut doc = MemoryDocument::new();
        let panel = doc.mount_element(doc.body(), Some("panel")).expect("panel");
        let chart = doc.mount_element(panel, Some("chart-1")).expect("chart");
        assert!(doc.is_attached(chart));

        assert!(doc.remove(panel));
        assert!(!doc.is_attached(chart));
        assert!(doc.element_by_id("chart-1").is_none());

        let batch = doc.take_mutations();
        assert_eq!(batch.removed, vec![panel]);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn id_lookup_finds_recreated_node() {
        let mut doc = MemoryDocument::new();
        let old = doc.mount_element(doc.body(), Some("chart-1")).expect("old");
        doc.remove(old);
        let new = doc.mount_element(doc.body(), Some("chart-1")).expect("new");

        assert_ne!(old, new);
        assert_eq!(doc.element_by_id("chart-1"), Some(new));
    }

    #[test]
    fn prune_frees_delivered_removals_only() {
        let mut doc = MemoryDocument::new();
        let panel = doc.mount_element(doc.body(), Some("panel")).expect("panel");
        let chart = doc.mount_element(panel, Some("chart-1")).expect("chart");
        let moved = doc.mount_element(doc.body(), Some("moved")).expect("moved");
        let kept = doc.mount_element(doc.body(), Some("kept")).expect("kept");
        assert_eq!(doc.element_count(), 5);

        doc.remove(panel);
        doc.remove(moved);
        doc.take_mutations();
        doc.append_child(kept, moved).expect("re-attach");
        let late = doc.mount_element(doc.body(), None).expect("late");
        doc.remove(late);

        assert_eq!(doc.prune_detached(), 2);
        assert!(!doc.is_attached(chart));
        assert!(doc.element_id(chart).is_none());
        assert!(doc.is_attached(moved));
        assert_eq!(doc.element_count(), 4);

        doc.take_mutations();
        assert_eq!(doc.prune_detached(), 1);
        assert_eq!(doc.prune_detached(), 0);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = MemoryDocument::new();
        let outer = doc.mount_element(doc.body(), None).expect("outer");
        let inner = doc.mount_element(outer, None).expect("inner");
        assert!(doc.append_child(inner, outer).is_err());
        assert!(!doc.remove(doc.body()));
    }
}
