use pflow_core::errors::{ErrorInfo, FlowError};
use pflow_core::schema::SchemaVersion;
use pflow_core::{Capacity, NodeId};
use serde::{Deserialize, Serialize};

use crate::network::FlowNetwork;

/// Schema version written into serialized networks.
pub const NETWORK_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the network to a compact binary representation using `bincode`.
pub fn network_to_bytes(network: &FlowNetwork) -> Result<Vec<u8>, FlowError> {
    let serializable = SerializableNetwork::from_network(network);
    bincode::serialize(&serializable)
        .map_err(|err| FlowError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a network from its binary representation.
pub fn network_from_bytes(bytes: &[u8]) -> Result<FlowNetwork, FlowError> {
    let serializable: SerializableNetwork = bincode::deserialize(bytes)
        .map_err(|err| FlowError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_network()
}

/// Serializes the network to a JSON string.
pub fn network_to_json(network: &FlowNetwork) -> Result<String, FlowError> {
    let serializable = SerializableNetwork::from_network(network);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| FlowError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a network from a JSON string.
pub fn network_from_json(json: &str) -> Result<FlowNetwork, FlowError> {
    let serializable: SerializableNetwork = serde_json::from_str(json)
        .map_err(|err| FlowError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_network()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNetwork {
    schema_version: SchemaVersion,
    num_nodes: usize,
    source: Option<u32>,
    sink: Option<u32>,
    arcs: Vec<SerializableArc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SerializableArc {
    from: u32,
    to: u32,
    capacity: Capacity,
}

impl SerializableNetwork {
    fn from_network(network: &FlowNetwork) -> Self {
        let arcs = network
            .arcs()
            .map(|(_, arc)| SerializableArc {
                from: arc.from.as_raw(),
                to: arc.to.as_raw(),
                capacity: arc.capacity,
            })
            .collect();
        Self {
            schema_version: NETWORK_SCHEMA,
            num_nodes: network.num_nodes(),
            source: network.source().map(|id| id.as_raw()),
            sink: network.sink().map(|id| id.as_raw()),
            arcs,
        }
    }

    fn into_network(self) -> Result<FlowNetwork, FlowError> {
        NETWORK_SCHEMA.check(&self.schema_version)?;
        let mut network = FlowNetwork::try_with_capacity(self.num_nodes, self.arcs.len())?;
        if let Some(source) = self.source {
            network.set_source(NodeId::from_raw(source))?;
        }
        if let Some(sink) = self.sink {
            network.set_sink(NodeId::from_raw(sink))?;
        }
        for arc in self.arcs {
            network.add_arc(
                NodeId::from_raw(arc.from),
                NodeId::from_raw(arc.to),
                arc.capacity,
            )?;
        }
        Ok(network)
    }
}
