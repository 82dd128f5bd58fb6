use pflow_core::errors::{ErrorInfo, FlowError};
use pflow_core::{NodeId, MAX_NETWORK_SIZE};

/// Converts a [`NodeId`] into its storage index, rejecting ids outside `1..=num_nodes`.
pub(crate) fn node_index(id: NodeId, num_nodes: usize) -> Result<usize, FlowError> {
    id.index()
        .filter(|idx| *idx < num_nodes)
        .ok_or_else(|| unknown_node(id.as_raw(), num_nodes))
}

/// Rejects node or arc counts that the 32-bit identifiers cannot address.
pub(crate) fn check_size(field: &str, count: usize) -> Result<(), FlowError> {
    if count > MAX_NETWORK_SIZE {
        return Err(too_large(field, count));
    }
    Ok(())
}

pub(crate) fn too_large(field: &str, count: usize) -> FlowError {
    FlowError::MalformedDescription(
        ErrorInfo::new("network-too-large", "network does not fit the 32-bit id range")
            .with_context("field", field)
            .with_context("count", count)
            .with_context("limit", MAX_NETWORK_SIZE),
    )
}

pub(crate) fn unknown_node(raw: impl ToString, num_nodes: usize) -> FlowError {
    FlowError::UnknownNodeReference(
        ErrorInfo::new("node-out-of-range", "node id is outside 1..=num_nodes")
            .with_context("node", raw)
            .with_context("num_nodes", num_nodes),
    )
}
