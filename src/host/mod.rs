//! Host document abstraction.
//!
//! A host owns the container nodes charts are mounted in and tells the
//! lifecycle manager whether a given node is still part of the live document.
//! Browsers map this onto the DOM; `MemoryDocument` is the headless version.

mod memory_document;

pub use memory_document::MemoryDocument;

use serde::{Deserialize, Serialize};

use crate::core::NodeId;

pub trait ContainerHost {
    /// Resolves an element id to an attached node.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn element_id(&self, node: NodeId) -> Option<String>;

    fn assign_element_id(&mut self, node: NodeId, id: &str);

    /// Liveness by node identity. A new node reusing an old id is a different node.
    fn is_attached(&self, node: NodeId) -> bool;

    fn clear_contents(&mut self, node: NodeId);

    /// Renders an inline error placeholder inside `node`.
    fn show_error(&mut self, node: NodeId, message: &str);

    /// Installs the host-wide resize listener that feeds `notify_resize`.
    fn subscribe_resize(&mut self);

    /// Installs the host-wide mutation observer that feeds `handle_mutations`.
    fn subscribe_mutations(&mut self);
}

/// One batch of structural document changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutationBatch {
    /// Roots of removed subtrees. Descendants are implied.
    pub removed: Vec<NodeId>,
    pub added: Vec<NodeId>,
}

impl MutationBatch {
    #[must_use]
    pub fn with_removed(removed: Vec<NodeId>) -> Self {
        Self {
            removed,
            added: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_removals(&self) -> bool {
        !self.removed.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
