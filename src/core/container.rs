use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a chart mount point (the container element id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerKey(String);

impl ContainerKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ContainerKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContainerKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContainerKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identity of one concrete container node.
///
/// Hosts must never reuse a token: a container recreated with the same element
/// id gets a fresh `NodeId`, which is how the removal watcher tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Caller-side reference to a container: either its element id or the node itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    Id(String),
    Node(NodeId),
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Node(node) => node.fmt(f),
        }
    }
}

impl From<&str> for ContainerRef {
    fn from(value: &str) -> Self {
        Self::Id(value.to_owned())
    }
}

impl From<String> for ContainerRef {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

impl From<&ContainerKey> for ContainerRef {
    fn from(value: &ContainerKey) -> Self {
        Self::Id(value.as_str().to_owned())
    }
}

impl From<ContainerKey> for ContainerRef {
    fn from(value: ContainerKey) -> Self {
        Self::Id(value.0)
    }
}

impl From<NodeId> for ContainerRef {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}
