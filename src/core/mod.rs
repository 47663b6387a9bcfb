pub mod container;
pub mod debounce;
pub mod instance_table;
pub mod spec;

pub use container::{ContainerKey, ContainerRef, NodeId};
pub use debounce::Debouncer;
pub use instance_table::{InstanceId, InstanceTable, TableEntry};
pub use spec::ChartSpec;
