use pflow_core::errors::{ErrorInfo, FlowError};
use pflow_core::{ArcEndpoints, ArcId, Capacity, NodeId};

use crate::ids::{check_size, node_index, too_large};

/// Upper bound on arcs reserved up front from a declared count.
const ARC_RESERVE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NodeRecord {
    out_arcs: Vec<ArcId>,
    in_arcs: Vec<ArcId>,
    out_capacity: Capacity,
    in_capacity: Capacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArcRecord {
    from: usize,
    to: usize,
    capacity: Capacity,
}

impl ArcRecord {
    fn endpoints(&self) -> ArcEndpoints {
        ArcEndpoints {
            from: NodeId::from_index(self.from),
            to: NodeId::from_index(self.to),
            capacity: self.capacity,
        }
    }
}

/// Directed capacitated network with one source and one sink.
///
/// Node ids are `1..=num_nodes`; arcs are numbered in insertion order and
/// that order is preserved by every adjacency query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNetwork {
    nodes: Vec<NodeRecord>,
    arcs: Vec<ArcRecord>,
    source: Option<usize>,
    sink: Option<usize>,
}

impl FlowNetwork {
    /// Creates a network with `num_nodes` isolated nodes and no terminals.
    ///
    /// `num_nodes` must not exceed [`MAX_NETWORK_SIZE`](pflow_core::MAX_NETWORK_SIZE); use
    /// [`try_with_capacity`](Self::try_with_capacity) for untrusted counts.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            nodes: vec![NodeRecord::default(); num_nodes],
            arcs: Vec::new(),
            source: None,
            sink: None,
        }
    }

    /// Creates a network sized from untrusted counts.
    ///
    /// Counts beyond the 32-bit id range, or node storage that cannot be
    /// allocated, fail with `MalformedDescription`. The arc reservation is
    /// capped; more arcs than that simply grow the storage.
    pub fn try_with_capacity(num_nodes: usize, num_arcs: usize) -> Result<Self, FlowError> {
        check_size("num_nodes", num_nodes)?;
        check_size("num_arcs", num_arcs)?;
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(num_nodes)
            .map_err(|_| too_large("num_nodes", num_nodes))?;
        nodes.resize(num_nodes, NodeRecord::default());
        Ok(Self {
            nodes,
            arcs: Vec::with_capacity(num_arcs.min(ARC_RESERVE_LIMIT)),
            source: None,
            sink: None,
        })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of arcs.
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Declared source, if any.
    pub fn source(&self) -> Option<NodeId> {
        self.source.map(NodeId::from_index)
    }

    /// Declared sink, if any.
    pub fn sink(&self) -> Option<NodeId> {
        self.sink.map(NodeId::from_index)
    }

    /// Designates the source node.
    pub fn set_source(&mut self, node: NodeId) -> Result<(), FlowError> {
        let idx = node_index(node, self.num_nodes())?;
        if self.sink == Some(idx) {
            return Err(terminal_clash(node));
        }
        self.source = Some(idx);
        Ok(())
    }

    /// Designates the sink node.
    pub fn set_sink(&mut self, node: NodeId) -> Result<(), FlowError> {
        let idx = node_index(node, self.num_nodes())?;
        if self.source == Some(idx) {
            return Err(terminal_clash(node));
        }
        self.sink = Some(idx);
        Ok(())
    }

    /// Appends the arc `from -> to` and registers it on both endpoints.
    pub fn add_arc(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    ) -> Result<ArcId, FlowError> {
        let num_nodes = self.num_nodes();
        let from_idx = node_index(from, num_nodes)?;
        let to_idx = node_index(to, num_nodes)?;
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity(
                ErrorInfo::new("negative-capacity", "arc capacity must be non-negative")
                    .with_context("from", from)
                    .with_context("to", to)
                    .with_context("capacity", capacity),
            ));
        }
        let index = self.arcs.len();
        check_size("num_arcs", index + 1)?;
        let out_capacity = self.nodes[from_idx].out_capacity.checked_add(capacity);
        let in_capacity = self.nodes[to_idx].in_capacity.checked_add(capacity);
        let (Some(out_capacity), Some(in_capacity)) = (out_capacity, in_capacity) else {
            return Err(FlowError::MalformedDescription(
                ErrorInfo::new(
                    "capacity-overflow",
                    "total capacity at a node exceeds the 64-bit range",
                )
                .with_context("from", from)
                .with_context("to", to)
                .with_context("capacity", capacity),
            ));
        };
        let id = ArcId::from_index(index);
        self.arcs.push(ArcRecord {
            from: from_idx,
            to: to_idx,
            capacity,
        });
        let tail = &mut self.nodes[from_idx];
        tail.out_arcs.push(id);
        tail.out_capacity = out_capacity;
        let head = &mut self.nodes[to_idx];
        head.in_arcs.push(id);
        head.in_capacity = in_capacity;
        Ok(id)
    }

    /// Returns the endpoints and capacity of an arc.
    pub fn arc(&self, id: ArcId) -> Result<ArcEndpoints, FlowError> {
        self.arcs
            .get(id.index())
            .map(ArcRecord::endpoints)
            .ok_or_else(|| {
                FlowError::MalformedDescription(
                    ErrorInfo::new("unknown-arc", "arc does not exist")
                        .with_context("arc", id.as_raw()),
                )
            })
    }

    /// Iterates over every arc in insertion order.
    pub fn arcs(&self) -> impl ExactSizeIterator<Item = (ArcId, ArcEndpoints)> + '_ {
        self.arcs
            .iter()
            .enumerate()
            .map(|(idx, record)| (ArcId::from_index(idx), record.endpoints()))
    }

    /// Iterates over every node id.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    /// Lazy sequence over the outgoing arcs of `node`, in insertion order.
    pub fn arcs_of(&self, node: NodeId) -> Result<ArcsOf<'_>, FlowError> {
        let idx = node_index(node, self.num_nodes())?;
        Ok(ArcsOf::new(self, &self.nodes[idx].out_arcs))
    }

    /// Lazy sequence over the incoming arcs of `node`, in insertion order.
    pub fn incoming_arcs_of(&self, node: NodeId) -> Result<ArcsOf<'_>, FlowError> {
        let idx = node_index(node, self.num_nodes())?;
        Ok(ArcsOf::new(self, &self.nodes[idx].in_arcs))
    }

    /// Out-degree of `node`.
    pub fn out_degree(&self, node: NodeId) -> Result<usize, FlowError> {
        Ok(self.arcs_of(node)?.len())
    }

    /// In-degree of `node`.
    pub fn in_degree(&self, node: NodeId) -> Result<usize, FlowError> {
        Ok(self.incoming_arcs_of(node)?.len())
    }

    /// Returns `(source, sink)` or fails with `MissingTerminal`.
    pub fn terminals(&self) -> Result<(NodeId, NodeId), FlowError> {
        let (source, sink) = self.terminal_indices()?;
        Ok((NodeId::from_index(source), NodeId::from_index(sink)))
    }

    /// Returns the 0-based storage indices of `(source, sink)`.
    pub fn terminal_indices(&self) -> Result<(usize, usize), FlowError> {
        let source = self.source.ok_or_else(|| {
            FlowError::MissingTerminal(
                ErrorInfo::new("missing-source", "no source node declared")
                    .with_hint("add a line `n <id> s`"),
            )
        })?;
        let sink = self.sink.ok_or_else(|| {
            FlowError::MissingTerminal(
                ErrorInfo::new("missing-sink", "no sink node declared")
                    .with_hint("add a line `n <id> t`"),
            )
        })?;
        Ok((source, sink))
    }

    /// Iterates over `(from, to, capacity)` with 0-based endpoint indices, in
    /// arc insertion order. Intended for solvers that keep their own arrays.
    pub fn raw_arcs(&self) -> impl ExactSizeIterator<Item = (usize, usize, Capacity)> + '_ {
        self.arcs
            .iter()
            .map(|record| (record.from, record.to, record.capacity))
    }

    /// Checks that the network is ready to be solved.
    pub fn validate(&self) -> Result<(), FlowError> {
        self.terminals().map(|_| ())
    }

    /// Total capacity leaving the source, an upper bound on any flow value.
    pub fn source_capacity(&self) -> Capacity {
        match self.source {
            Some(source) => self.nodes[source]
                .out_arcs
                .iter()
                .map(|arc| self.arcs[arc.index()])
                .filter(|record| record.to != source)
                .map(|record| record.capacity)
                .sum(),
            None => 0,
        }
    }

    pub(crate) fn check_node(&self, raw: u32) -> Result<NodeId, FlowError> {
        let id = NodeId::from_raw(raw);
        node_index(id, self.num_nodes()).map(|_| id)
    }
}

/// Restartable iterator over a node's arcs; clone it to scan again from the start.
#[derive(Debug, Clone)]
pub struct ArcsOf<'a> {
    network: &'a FlowNetwork,
    ids: &'a [ArcId],
    position: usize,
}

impl<'a> ArcsOf<'a> {
    fn new(network: &'a FlowNetwork, ids: &'a [ArcId]) -> Self {
        Self {
            network,
            ids,
            position: 0,
        }
    }

    /// Rewinds the sequence to the first arc.
    pub fn restart(&mut self) {
        self.position = 0;
    }
}

impl Iterator for ArcsOf<'_> {
    type Item = (ArcId, ArcEndpoints);

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.get(self.position)?;
        self.position += 1;
        Some((id, self.network.arcs[id.index()].endpoints()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcsOf<'_> {}

fn terminal_clash(node: NodeId) -> FlowError {
    FlowError::MalformedDescription(
        ErrorInfo::new("source-equals-sink", "source and sink must be distinct nodes")
            .with_context("node", node),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(raw: u32) -> NodeId {
        NodeId::from_raw(raw)
    }

    #[test]
    fn arcs_keep_insertion_order() {
        let mut network = FlowNetwork::new(3);
        network.add_arc(node(1), node(3), 4).unwrap();
        network.add_arc(node(1), node(2), 7).unwrap();
        network.add_arc(node(2), node(3), 1).unwrap();

        let heads: Vec<u32> = network
            .arcs_of(node(1))
            .unwrap()
            .map(|(_, arc)| arc.to.as_raw())
            .collect();
        assert_eq!(heads, vec![3, 2]);

        let tails: Vec<u32> = network
            .incoming_arcs_of(node(3))
            .unwrap()
            .map(|(_, arc)| arc.from.as_raw())
            .collect();
        assert_eq!(tails, vec![1, 2]);
    }

    #[test]
    fn arcs_of_restarts() {
        let mut network = FlowNetwork::new(2);
        network.add_arc(node(1), node(2), 1).unwrap();
        network.add_arc(node(1), node(2), 2).unwrap();
        let mut arcs = network.arcs_of(node(1)).unwrap();
        assert_eq!(arcs.len(), 2);
        assert!(arcs.next().is_some());
        assert!(arcs.next().is_some());
        assert!(arcs.next().is_none());
        arcs.restart();
        assert_eq!(arcs.count(), 2);
    }

    #[test]
    fn rejects_out_of_range_nodes() {
        let mut network = FlowNetwork::new(2);
        let err = network.add_arc(node(1), node(3), 1).unwrap_err();
        assert!(matches!(err, FlowError::UnknownNodeReference(_)));
        let err = network.add_arc(node(0), node(1), 1).unwrap_err();
        assert!(matches!(err, FlowError::UnknownNodeReference(_)));
        assert_eq!(network.num_arcs(), 0);
    }

    #[test]
    fn rejects_negative_capacity() {
        let mut network = FlowNetwork::new(2);
        let err = network.add_arc(node(1), node(2), -1).unwrap_err();
        assert!(matches!(err, FlowError::NegativeCapacity(_)));
    }

    #[test]
    fn terminals_must_be_declared_and_distinct() {
        let mut network = FlowNetwork::new(2);
        assert!(matches!(
            network.validate().unwrap_err(),
            FlowError::MissingTerminal(info) if info.code == "missing-source"
        ));
        network.set_source(node(1)).unwrap();
        assert!(matches!(
            network.validate().unwrap_err(),
            FlowError::MissingTerminal(info) if info.code == "missing-sink"
        ));
        assert!(matches!(
            network.set_sink(node(1)).unwrap_err(),
            FlowError::MalformedDescription(_)
        ));
        network.set_sink(node(2)).unwrap();
        assert_eq!(network.terminals().unwrap(), (node(1), node(2)));
    }
}
