#![deny(missing_docs)]
#![doc = "Core identifiers, errors and run configuration shared by the pseudoflow crates."]

use serde::{Deserialize, Serialize};

pub mod config;
pub mod errors;
pub mod rng;
pub mod schema;

pub use config::{BucketOrder, LabelOrder, RunConfig};
pub use errors::{ErrorInfo, FlowError};
pub use rng::{derive_substream_seed, RngHandle};
pub use schema::SchemaVersion;

/// Arc capacities, flows and node excesses.
pub type Capacity = i64;

/// Identifier for a node within a flow network.
///
/// Ids are 1-based as in the DIMACS format; `NodeId::from_raw(0)` is never a
/// valid node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new identifier from its raw 1-based representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a 0-based storage index.
    ///
    /// Networks hold at most [`MAX_NETWORK_SIZE`] nodes, so every storage
    /// index maps onto a 1-based `u32`.
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_NETWORK_SIZE, "node index {index} exceeds the id range");
        Self(index as u32 + 1)
    }

    /// Returns the raw 1-based representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the 0-based storage index, or `None` for the invalid id 0.
    pub fn index(&self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest number of nodes, and of arcs, a single network can hold. Both
/// identifier types are 32-bit.
pub const MAX_NETWORK_SIZE: usize = u32::MAX as usize;

/// Identifier for an arc within a flow network, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArcId(u32);

impl ArcId {
    /// Creates a new identifier from its raw 0-based representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a storage index below [`MAX_NETWORK_SIZE`].
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_NETWORK_SIZE, "arc index {index} exceeds the id range");
        Self(index as u32)
    }

    /// Returns the raw 0-based representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the storage index of the arc.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Directed arc description returned by network queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcEndpoints {
    /// Tail of the arc.
    pub from: NodeId,
    /// Head of the arc.
    pub to: NodeId,
    /// Original capacity.
    pub capacity: Capacity,
}
