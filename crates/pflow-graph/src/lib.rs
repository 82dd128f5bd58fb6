#![deny(missing_docs)]

//! Flow network storage for the pseudoflow solver.
//!
//! [`FlowNetwork`] owns nodes, arcs and per-node adjacency. It is built once,
//! either through [`FlowNetwork::add_arc`] or from a DIMACS `p max`
//! description, and is read-only afterwards: solver runs copy whatever
//! mutable state they need.

mod dimacs;
mod generators;
mod hash;
mod ids;
mod network;
mod serialization;

pub use dimacs::{parse_dimacs, read_dimacs, read_dimacs_file, DimacsProblem};
pub use generators::{gen_layered_network, gen_random_network};
pub use hash::canonical_hash;
pub use network::{ArcsOf, FlowNetwork};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    network_from_bytes, network_from_json, network_to_bytes, network_to_json, NETWORK_SCHEMA,
};
