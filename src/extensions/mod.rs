//! Observer hooks for host applications.
//!
//! Observers see lifecycle transitions after they happen and cannot reach
//! into the instance table.

mod observers;

pub use observers::{DisposeReason, LifecycleEvent, LifecycleObserver};
