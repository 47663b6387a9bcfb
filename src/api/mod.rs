mod batch;
mod container_resolver;
mod lifecycle_config;
mod lifecycle_facade;
mod lifecycle_stats;
mod manager;
mod observer_registry;
mod removal_watcher;
mod resize_broadcaster;

pub use batch::{BatchItem, BatchSummary, ChartRequest};
pub use lifecycle_config::LifecycleConfig;
pub use lifecycle_stats::LifecycleStats;
pub use manager::{ChartLifecycleManager, MountedChart};
pub use resize_broadcaster::ResizeReport;

pub(crate) use removal_watcher::RemovalWatcher;
pub(crate) use resize_broadcaster::ResizeBroadcaster;
