use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use pflow_core::{ArcId, Capacity, NodeId};

use crate::residual::ResidualGraph;

/// Flow carried by one original arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcFlow {
    /// Arc identifier (insertion index).
    pub arc: ArcId,
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
    /// Original capacity.
    pub capacity: Capacity,
    /// Flow in `0..=capacity`.
    pub flow: Capacity,
}

/// An original arc leaving the source side of the cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutArc {
    /// Arc identifier (insertion index).
    pub arc: ArcId,
    /// Tail node, on the source side.
    pub from: NodeId,
    /// Head node, on the sink side.
    pub to: NodeId,
    /// Capacity, fully used by the maximum flow.
    pub capacity: Capacity,
}

/// Minimum s-t cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Nodes reachable from the source in the final residual network, ascending.
    pub source_side: Vec<NodeId>,
    /// Remaining nodes, ascending.
    pub sink_side: Vec<NodeId>,
    /// Original arcs from the source side to the sink side, in insertion order.
    pub crossing_arcs: Vec<CutArc>,
    /// Sum of the crossing capacities; equals the maximum flow value.
    pub capacity: Capacity,
}

impl MinCut {
    /// Whether `node` lies on the source side.
    pub fn contains(&self, node: NodeId) -> bool {
        self.source_side.binary_search(&node).is_ok()
    }
}

/// Result of a completed run. All accessors are read-only and can be called
/// any number of times.
#[derive(Debug, Clone)]
pub struct Solution {
    graph: ResidualGraph,
    source: usize,
    sink: usize,
    max_flow: Capacity,
    source_side_by_label: Vec<bool>,
}

impl Solution {
    pub(crate) fn new(
        graph: ResidualGraph,
        source: usize,
        sink: usize,
        max_flow: Capacity,
        source_side_by_label: Vec<bool>,
    ) -> Self {
        Self {
            graph,
            source,
            sink,
            max_flow,
            source_side_by_label,
        }
    }

    /// Value of the maximum flow (excess absorbed at the sink).
    pub fn max_flow_value(&self) -> Capacity {
        self.max_flow
    }

    /// Number of nodes of the solved network.
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Number of arcs of the solved network.
    pub fn num_arcs(&self) -> usize {
        self.graph.num_arcs()
    }

    /// Source node.
    pub fn source(&self) -> NodeId {
        NodeId::from_index(self.source)
    }

    /// Sink node.
    pub fn sink(&self) -> NodeId {
        NodeId::from_index(self.sink)
    }

    /// Flow on a single arc, or `None` for an unknown id.
    pub fn arc_flow(&self, arc: ArcId) -> Option<ArcFlow> {
        (arc.index() < self.graph.num_arcs()).then(|| self.arc_flow_at(arc.index()))
    }

    /// Per-arc flows in arc insertion order.
    pub fn flow_decomposition(&self) -> Vec<ArcFlow> {
        (0..self.graph.num_arcs())
            .map(|idx| self.arc_flow_at(idx))
            .collect()
    }

    /// Minimum cut whose source side is everything the source still reaches
    /// through arcs with positive residual capacity.
    pub fn min_cut(&self) -> MinCut {
        let reachable = self.reachable_from_source();
        let mut source_side = Vec::new();
        let mut sink_side = Vec::new();
        for (idx, &inside) in reachable.iter().enumerate() {
            if inside {
                source_side.push(NodeId::from_index(idx));
            } else {
                sink_side.push(NodeId::from_index(idx));
            }
        }

        let mut crossing_arcs = Vec::new();
        let mut capacity = 0;
        for idx in 0..self.graph.num_arcs() {
            let (from, to) = self.graph.endpoints(idx);
            if reachable[from] && !reachable[to] {
                let cap = self.graph.capacity(idx);
                debug_assert_eq!(self.graph.flow(idx), cap, "unsaturated cut arc {idx}");
                capacity += cap;
                crossing_arcs.push(CutArc {
                    arc: ArcId::from_index(idx),
                    from: NodeId::from_index(from),
                    to: NodeId::from_index(to),
                    capacity: cap,
                });
            }
        }

        MinCut {
            source_side,
            sink_side,
            crossing_arcs,
            capacity,
        }
    }

    /// Nodes whose phase-one label reached `N`, ascending. This is also a
    /// minimum cut source side, though not necessarily the one reported by
    /// [`min_cut`](Self::min_cut).
    pub fn source_set_by_label(&self) -> Vec<NodeId> {
        self.source_side_by_label
            .iter()
            .enumerate()
            .filter(|(_, &inside)| inside)
            .map(|(idx, _)| NodeId::from_index(idx))
            .collect()
    }

    fn arc_flow_at(&self, idx: usize) -> ArcFlow {
        let (from, to) = self.graph.endpoints(idx);
        ArcFlow {
            arc: ArcId::from_index(idx),
            from: NodeId::from_index(from),
            to: NodeId::from_index(to),
            capacity: self.graph.capacity(idx),
            flow: self.graph.flow(idx),
        }
    }

    fn reachable_from_source(&self) -> Vec<bool> {
        let mut seen = vec![false; self.graph.num_nodes()];
        let mut queue = VecDeque::from([self.source]);
        seen[self.source] = true;
        while let Some(node) = queue.pop_front() {
            for &arc in self.graph.arcs_from(node) {
                let head = self.graph.head(arc);
                if !seen[head] && self.graph.residual(arc) > 0 {
                    seen[head] = true;
                    queue.push_back(head);
                }
            }
        }
        debug_assert!(!seen[self.sink], "sink reachable after max flow");
        seen
    }
}
