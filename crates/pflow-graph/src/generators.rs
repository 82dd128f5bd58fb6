use pflow_core::errors::{ErrorInfo, FlowError};
use pflow_core::rng::RngHandle;
use pflow_core::{Capacity, NodeId};
use rand::seq::SliceRandom;

use crate::network::FlowNetwork;

/// Generates a network with uniformly random arcs; node 1 is the source and
/// node `num_nodes` the sink.
pub fn gen_random_network(
    num_nodes: usize,
    num_arcs: usize,
    max_capacity: Capacity,
    rng: &mut RngHandle,
) -> Result<FlowNetwork, FlowError> {
    if num_nodes < 2 {
        return Err(too_small(num_nodes));
    }
    let mut network = FlowNetwork::try_with_capacity(num_nodes, num_arcs)?;
    network.set_source(NodeId::from_index(0))?;
    network.set_sink(NodeId::from_index(num_nodes - 1))?;
    for _ in 0..num_arcs {
        let (from, to) = rng.distinct_pair(num_nodes);
        let capacity = rng.capacity(max_capacity);
        network.add_arc(NodeId::from_index(from), NodeId::from_index(to), capacity)?;
    }
    Ok(network)
}

/// Generates a layered network: the source feeds the first layer, each layer
/// feeds up to `fan_out` nodes of the next one, and the last layer drains
/// into the sink. A few backward arcs between adjacent layers are mixed in.
///
/// Every layer draws from its own substream of `seed`, so growing `layers`
/// keeps the earlier layers unchanged.
pub fn gen_layered_network(
    layers: usize,
    width: usize,
    fan_out: usize,
    max_capacity: Capacity,
    seed: u64,
) -> Result<FlowNetwork, FlowError> {
    if layers == 0 || width == 0 {
        return Err(too_small(2));
    }
    let num_nodes = layers * width + 2;
    let source = NodeId::from_index(0);
    let sink = NodeId::from_index(num_nodes - 1);
    let layer_node = |layer: usize, slot: usize| NodeId::from_index(1 + layer * width + slot);

    let mut network = FlowNetwork::new(num_nodes);
    network.set_source(source)?;
    network.set_sink(sink)?;

    let mut rng = RngHandle::substream(seed, 0);
    for slot in 0..width {
        let capacity = rng.positive_capacity(max_capacity);
        network.add_arc(source, layer_node(0, slot), capacity)?;
    }

    let slots: Vec<usize> = (0..width).collect();
    for layer in 0..layers - 1 {
        let mut rng = RngHandle::substream(seed, layer as u64 + 1);
        for slot in 0..width {
            let targets: Vec<usize> = slots
                .choose_multiple(&mut rng, fan_out.clamp(1, width))
                .copied()
                .collect();
            for target in targets {
                let capacity = rng.positive_capacity(max_capacity);
                network.add_arc(layer_node(layer, slot), layer_node(layer + 1, target), capacity)?;
            }
            if rng.chance(0.1) {
                let back = rng.index(width);
                let capacity = rng.positive_capacity(max_capacity);
                network.add_arc(layer_node(layer + 1, back), layer_node(layer, slot), capacity)?;
            }
        }
    }

    let mut rng = RngHandle::substream(seed, layers as u64);
    for slot in 0..width {
        let capacity = rng.positive_capacity(max_capacity);
        network.add_arc(layer_node(layers - 1, slot), sink, capacity)?;
    }
    Ok(network)
}

fn too_small(num_nodes: usize) -> FlowError {
    FlowError::MalformedDescription(
        ErrorInfo::new("too-few-nodes", "generator needs at least a source and a sink")
            .with_context("num_nodes", num_nodes),
    )
}
