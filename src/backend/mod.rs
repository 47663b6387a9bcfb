mod null_backend;

pub use null_backend::{BackendEvent, NullBackend, NullChart};

use crate::core::{ChartSpec, NodeId};
use crate::error::LifecycleResult;

/// Contract implemented by any charting library adapter.
///
/// The lifecycle manager only ever creates, re-specs, resizes and disposes
/// charts; layout and drawing stay inside the adapter.
pub trait ChartBackend {
    type Handle: ChartHandle;

    fn create(&mut self, node: NodeId, spec: &ChartSpec) -> LifecycleResult<Self::Handle>;
}

/// Capability surface of one mounted chart.
pub trait ChartHandle {
    /// Applies the full effective spec (merging already happened upstream).
    fn apply_spec(&mut self, spec: &ChartSpec) -> LifecycleResult<()>;

    fn resize(&mut self) -> LifecycleResult<()>;

    /// Releases rendering resources. Called at most once by the manager.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
