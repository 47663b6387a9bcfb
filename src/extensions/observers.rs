use serde::{Deserialize, Serialize};

use crate::core::{ContainerKey, InstanceId, NodeId};

/// Why a chart left the instance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposeReason {
    /// `destroy` was called for the container.
    Explicit,
    /// A new chart was created for the same container.
    Replaced,
    /// The container node was removed from the document.
    Detached,
    /// `destroy_all` or manager drop.
    Teardown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Created {
        key: ContainerKey,
        instance: InstanceId,
        node: NodeId,
    },
    Updated {
        key: ContainerKey,
        instance: InstanceId,
        replaced_spec: bool,
    },
    Disposed {
        key: ContainerKey,
        instance: InstanceId,
        reason: DisposeReason,
    },
    CreationFailed {
        container: String,
        message: String,
    },
    ResizePass {
        resized: usize,
        failed: usize,
    },
}

/// Hook interface for dashboards that track chart churn.
pub trait LifecycleObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &LifecycleEvent);
}
