use sha2::{Digest, Sha256};

use crate::network::FlowNetwork;
use crate::serialization::NETWORK_SCHEMA;

/// Computes the canonical structural hash for the provided network.
///
/// Arc order is part of the hash: it fixes the scan order of the solver and
/// therefore the operation counts reported for a run.
pub fn canonical_hash(network: &FlowNetwork) -> String {
    let mut hasher = Sha256::new();
    hasher.update(NETWORK_SCHEMA.major.to_le_bytes());
    hasher.update(NETWORK_SCHEMA.minor.to_le_bytes());
    hasher.update((network.num_nodes() as u64).to_le_bytes());
    encode_terminal("source", network.source().map(|id| id.as_raw()), &mut hasher);
    encode_terminal("sink", network.sink().map(|id| id.as_raw()), &mut hasher);

    hasher.update((network.num_arcs() as u64).to_le_bytes());
    for (_, arc) in network.arcs() {
        hasher.update(arc.from.as_raw().to_le_bytes());
        hasher.update(arc.to.as_raw().to_le_bytes());
        hasher.update(arc.capacity.to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}

fn encode_terminal(label: &str, value: Option<u32>, hasher: &mut Sha256) {
    hasher.update(label.as_bytes());
    match value {
        Some(v) => {
            hasher.update(b":some");
            hasher.update(v.to_le_bytes());
        }
        None => hasher.update(b":none"),
    }
}
