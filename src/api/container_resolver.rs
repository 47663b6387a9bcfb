use crate::backend::ChartBackend;
use crate::core::{ContainerKey, ContainerRef, NodeId};
use crate::error::{LifecycleError, LifecycleResult};
use crate::host::ContainerHost;

use super::ChartLifecycleManager;

impl<B: ChartBackend, H: ContainerHost> ChartLifecycleManager<B, H> {
    /// Resolves a container reference to an attached node and its key.
    ///
    /// Nodes passed without an element id get a generated one written back
    /// to the host, so later id-based calls reach the same chart.
    pub(super) fn resolve_container(
        &mut self,
        container: &ContainerRef,
    ) -> LifecycleResult<(NodeId, ContainerKey)> {
        match container {
            ContainerRef::Id(id) => {
                if id.is_empty() {
                    return Err(LifecycleError::ContainerNotFound(
                        "empty container id".to_owned(),
                    ));
                }
                let node = self
                    .host
                    .element_by_id(id)
                    .ok_or_else(|| LifecycleError::ContainerNotFound(id.clone()))?;
                Ok((node, ContainerKey::new(id.as_str())))
            }
            ContainerRef::Node(node) => {
                if !self.host.is_attached(*node) {
                    return Err(LifecycleError::ContainerNotFound(format!(
                        "{node} is not attached to the document"
                    )));
                }
                let id = match self.host.element_id(*node) {
                    Some(id) if !id.is_empty() => id,
                    _ => {
                        let generated = self.next_auto_container_id();
                        self.host.assign_element_id(*node, &generated);
                        generated
                    }
                };
                Ok((*node, ContainerKey::from(id)))
            }
        }
    }

    /// Maps a reference onto a table key without touching the host.
    ///
    /// Node references only match the entry registered for that exact node.
    /// A stale node whose id now belongs to another container maps to nothing.
    pub(super) fn lookup_key(&self, container: &ContainerRef) -> Option<ContainerKey> {
        match container {
            ContainerRef::Id(id) => Some(ContainerKey::new(id.as_str())),
            ContainerRef::Node(node) => self
                .table
                .values()
                .find(|(_, entry)| entry.node() == *node)
                .map(|(key, _)| key.clone()),
        }
    }
}
