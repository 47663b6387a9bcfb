//! chart-lifecycle: lifecycle registry for dashboard chart instances.
//!
//! A `ChartLifecycleManager` keeps at most one live chart per container,
//! fans debounced resize notifications out to every live chart and disposes
//! charts whose container left the host document. Charting libraries plug in
//! through `backend::ChartBackend`; documents through `host::ContainerHost`.

pub mod api;
pub mod backend;
pub mod core;
pub mod error;
pub mod extensions;
pub mod host;
pub mod telemetry;

pub use api::{ChartLifecycleManager, LifecycleConfig, MountedChart};
pub use error::{LifecycleError, LifecycleResult};
