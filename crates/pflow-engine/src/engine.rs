use log::{debug, trace};

use pflow_core::{Capacity, FlowError, RunConfig};
use pflow_graph::FlowNetwork;

use crate::buckets::BucketScheduler;
use crate::extract::Solution;
use crate::forest::Forest;
use crate::residual::ResidualGraph;
use crate::stats::{Phase, RunContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    MinCut,
    Recovery,
}

/// Per-run solver state over one [`FlowNetwork`].
///
/// Labels start at 0 (source at `N`). Only tree roots hold positive excess;
/// every tree arc points from child to parent, has positive residual and
/// drops exactly one label. Residual arcs never drop more than one label.
#[derive(Debug, Clone)]
pub struct PseudoflowEngine {
    config: RunConfig,
    graph: ResidualGraph,
    forest: Forest,
    scheduler: BucketScheduler,
    label: Vec<usize>,
    excess: Vec<Capacity>,
    cursor: Vec<usize>,
    source: usize,
    sink: usize,
    released: Vec<usize>,
}

impl PseudoflowEngine {
    /// Builds residual state for `network`; fails with `MissingTerminal` when
    /// the source or sink is undeclared.
    pub fn new(network: &FlowNetwork, config: RunConfig) -> Result<Self, FlowError> {
        let (source, sink) = network.terminal_indices()?;
        let num_nodes = network.num_nodes();
        let graph = ResidualGraph::build(network);
        let mut scheduler = BucketScheduler::new(
            num_nodes,
            2 * num_nodes,
            config.label_order(),
            config.bucket_order(),
        );
        scheduler.set_window(num_nodes);
        let mut label = vec![0; num_nodes];
        label[source] = num_nodes;
        for &l in &label {
            scheduler.register(l);
        }
        debug!(
            "engine ready: {} nodes, {} arcs, source {}, sink {}, {:?}/{:?}",
            num_nodes,
            graph.num_arcs(),
            source + 1,
            sink + 1,
            config.label_order(),
            config.bucket_order()
        );
        Ok(Self {
            config,
            graph,
            forest: Forest::new(num_nodes),
            scheduler,
            label,
            excess: vec![0; num_nodes],
            cursor: vec![0; num_nodes],
            source,
            sink,
            released: Vec::new(),
        })
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> RunConfig {
        self.config
    }

    /// Number of nodes in the underlying network.
    pub fn num_nodes(&self) -> usize {
        self.label.len()
    }

    /// Runs both phases and hands the final residual state to a [`Solution`].
    pub fn run(mut self, ctx: &mut RunContext) -> Solution {
        ctx.timed(Phase::Initialize, |ctx| self.saturate_source(ctx));

        ctx.timed(Phase::MinCut, |ctx| self.drain(Stage::MinCut, ctx));
        self.check_invariants();
        let n = self.num_nodes();
        let source_side_by_label: Vec<bool> = self.label.iter().map(|&l| l >= n).collect();
        debug!(
            "minimum cut fixed: preflow value {}, {} nodes on the source side",
            self.excess[self.sink],
            source_side_by_label.iter().filter(|&&side| side).count()
        );

        ctx.timed(Phase::MaxFlow, |ctx| {
            self.begin_recovery();
            self.drain(Stage::Recovery, ctx);
        });
        self.check_invariants();
        debug_assert!(
            (0..n).all(|v| v == self.source || v == self.sink || self.excess[v] == 0),
            "excess left after recovery"
        );
        debug!(
            "flow recovered: value {}, {} pushes, {} relabels",
            self.excess[self.sink], ctx.stats.recovery_pushes, ctx.stats.recovery_relabels
        );

        Solution::new(
            self.graph,
            self.source,
            self.sink,
            self.excess[self.sink],
            source_side_by_label,
        )
    }

    fn saturate_source(&mut self, ctx: &mut RunContext) {
        let source = self.source;
        for position in 0..self.graph.arcs_from(source).len() {
            let arc = self.graph.arcs_from(source)[position];
            let head = self.graph.head(arc);
            if !ResidualGraph::is_forward(arc) || head == source {
                continue;
            }
            let delta = self.graph.residual(arc);
            if delta == 0 {
                continue;
            }
            self.move_excess(arc, source, head, delta);
            ctx.stats.pushes += 1;
            if head != self.sink {
                self.scheduler.activate(head, self.label[head]);
            }
        }
        debug!(
            "source saturated: {} units on {} strong roots",
            -self.excess[source],
            self.scheduler.len()
        );
    }

    fn begin_recovery(&mut self) {
        let n = self.num_nodes();
        self.scheduler.set_window(2 * n);
        for node in 0..n {
            if self.is_terminal(node) || self.excess[node] == 0 {
                continue;
            }
            debug_assert!(self.forest.is_root(node), "excess below root at {node}");
            self.scheduler.activate(node, self.label[node]);
        }
        debug!("recovery: {} roots hold excess", self.scheduler.len());
    }

    fn drain(&mut self, stage: Stage, ctx: &mut RunContext) {
        while let Some(root) = self.scheduler.next_root() {
            self.process_root(root, stage, ctx);
        }
    }

    /// Scans `root` from its cursor until its excess is gone or the list is
    /// exhausted, in which case it is relabelled once.
    fn process_root(&mut self, root: usize, stage: Stage, ctx: &mut RunContext) {
        debug_assert!(self.forest.is_root(root), "scheduled non-root {root}");
        while self.excess[root] > 0 {
            let Some(arc) = self.graph.arc_at(root, self.cursor[root]) else {
                self.relabel(root, stage, ctx);
                break;
            };
            ctx.stats.arc_scans += 1;
            let head = self.graph.head(arc);
            if self.graph.residual(arc) > 0 && self.label[root] == self.label[head] + 1 {
                self.push_from_root(root, arc, head, stage, ctx);
                if self.excess[root] == 0 {
                    break;
                }
            }
            self.cursor[root] += 1;
        }
        if self.excess[root] > 0 {
            self.scheduler.activate(root, self.label[root]);
        }
    }

    fn push_from_root(
        &mut self,
        root: usize,
        arc: usize,
        head: usize,
        stage: Stage,
        ctx: &mut RunContext,
    ) {
        let delta = self.excess[root].min(self.graph.residual(arc));
        self.move_excess(arc, root, head, delta);
        count_push(stage, ctx);
        if self.excess[root] == 0 && self.graph.residual(arc) > 0 && !self.is_terminal(head) {
            self.forest.attach(root, head, arc);
            ctx.stats.mergers += 1;
        }
        self.settle(head, stage, ctx);
    }

    /// Carries the excess sitting at `node` up its tree to the root, cutting
    /// tree arcs that saturate on the way.
    fn settle(&mut self, mut node: usize, stage: Stage, ctx: &mut RunContext) {
        while !self.is_terminal(node) && self.excess[node] > 0 {
            let Some(link) = self.forest.link(node) else {
                self.scheduler.activate(node, self.label[node]);
                return;
            };
            let delta = self.excess[node].min(self.graph.residual(link.arc));
            self.move_excess(link.arc, node, link.parent, delta);
            count_push(stage, ctx);
            if self.graph.residual(link.arc) == 0 {
                self.forest.detach(node);
                ctx.stats.splits += 1;
                if self.excess[node] > 0 {
                    self.scheduler.activate(node, self.label[node]);
                }
            }
            node = link.parent;
        }
    }

    fn relabel(&mut self, root: usize, stage: Stage, ctx: &mut RunContext) {
        let mut released = std::mem::take(&mut self.released);
        self.forest.detach_children(root, &mut released);
        for child in released.drain(..) {
            if self.excess[child] > 0 {
                self.scheduler.activate(child, self.label[child]);
            }
        }
        self.released = released;

        let old = self.label[root];
        let new = old + 1;
        self.label[root] = new;
        self.cursor[root] = 0;
        self.scheduler.relabel_to(root, old, new);
        match stage {
            Stage::MinCut => ctx.stats.relabels += 1,
            Stage::Recovery => ctx.stats.recovery_relabels += 1,
        }

        if stage == Stage::MinCut && old < self.num_nodes() && self.scheduler.label_count(old) == 0
        {
            self.gap(old, ctx);
        }
    }

    /// Lifts every node labelled strictly between `empty` and `N` to `N`;
    /// none of them can reach the sink any more.
    fn gap(&mut self, empty: usize, ctx: &mut RunContext) {
        let n = self.num_nodes();
        let mut released = std::mem::take(&mut self.released);
        let mut lifted = 0u64;
        for node in 0..n {
            let l = self.label[node];
            if l <= empty || l >= n {
                continue;
            }
            self.scheduler.deactivate(node);
            self.forest.detach(node);
            self.forest.detach_children(node, &mut released);
            self.scheduler.relabel_to(node, l, n);
            self.label[node] = n;
            self.cursor[node] = 0;
            lifted += 1;
        }
        released.clear();
        self.released = released;
        ctx.stats.gaps += 1;
        ctx.stats.gap_nodes += lifted;
        trace!("gap at label {empty}: lifted {lifted} nodes to {n}");
    }

    fn move_excess(&mut self, arc: usize, from: usize, to: usize, delta: Capacity) {
        self.graph.push(arc, delta);
        self.excess[from] -= delta;
        self.excess[to] += delta;
    }

    fn is_terminal(&self, node: usize) -> bool {
        node == self.source || node == self.sink
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let n = self.num_nodes();
        for node in 0..n {
            if self.is_terminal(node) {
                continue;
            }
            assert!(self.excess[node] >= 0, "negative excess at {node}");
            for &child in self.forest.children(node) {
                assert_eq!(self.forest.link(child).map(|link| link.parent), Some(node));
            }
            assert!(self.forest.is_root(self.forest.root_of(node)));
            if let Some(link) = self.forest.link(node) {
                assert_eq!(self.excess[node], 0, "excess below root at {node}");
                assert!(self.graph.residual(link.arc) > 0, "saturated tree arc");
                assert_eq!(self.label[node], self.label[link.parent] + 1);
            }
            for &arc in self.graph.arcs_from(node) {
                if self.graph.residual(arc) > 0 {
                    let head = self.graph.head(arc);
                    assert!(
                        self.label[node] <= self.label[head] + 1,
                        "label drop on arc {node}->{head}"
                    );
                }
            }
        }
        let total: i128 = self.excess.iter().map(|&excess| i128::from(excess)).sum();
        assert_eq!(total, 0, "excess not conserved");
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&self) {}
}

fn count_push(stage: Stage, ctx: &mut RunContext) {
    match stage {
        Stage::MinCut => ctx.stats.pushes += 1,
        Stage::Recovery => ctx.stats.recovery_pushes += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pflow_core::NodeId;

    fn chain(capacities: &[Capacity]) -> FlowNetwork {
        let mut network = FlowNetwork::new(capacities.len() + 1);
        for (idx, &cap) in capacities.iter().enumerate() {
            network
                .add_arc(NodeId::from_index(idx), NodeId::from_index(idx + 1), cap)
                .unwrap();
        }
        network.set_source(NodeId::from_index(0)).unwrap();
        network
            .set_sink(NodeId::from_index(capacities.len()))
            .unwrap();
        network
    }

    #[test]
    fn chain_bottleneck_strands_excess_then_recovers_it() {
        let network = chain(&[9, 2, 7]);
        for config in RunConfig::policy_grid(false) {
            let mut ctx = RunContext::default();
            let engine = PseudoflowEngine::new(&network, config).unwrap();
            let solution = engine.run(&mut ctx);
            assert_eq!(solution.max_flow_value(), 2);
            let flows: Vec<_> = solution
                .flow_decomposition()
                .iter()
                .map(|f| f.flow)
                .collect();
            assert_eq!(flows, vec![2, 2, 2]);
            assert!(ctx.stats.recovery_pushes > 0);
        }
    }

    #[test]
    fn missing_sink_is_rejected_before_running() {
        let mut network = FlowNetwork::new(2);
        network.set_source(NodeId::from_raw(1)).unwrap();
        let err = PseudoflowEngine::new(&network, RunConfig::default()).unwrap_err();
        assert!(matches!(err, FlowError::MissingTerminal(info) if info.code == "missing-sink"));
    }

    #[test]
    fn gap_lifts_nodes_cut_off_from_sink() {
        // 2 and 3 feed each other but only 2 -> 4 (capacity 1) reaches the sink.
        let mut network = FlowNetwork::new(4);
        let arcs = [(1, 2, 5), (1, 3, 5), (2, 3, 5), (3, 2, 5), (2, 4, 1)];
        for (from, to, cap) in arcs {
            network
                .add_arc(NodeId::from_raw(from), NodeId::from_raw(to), cap)
                .unwrap();
        }
        network.set_source(NodeId::from_raw(1)).unwrap();
        network.set_sink(NodeId::from_raw(4)).unwrap();

        let mut ctx = RunContext::default();
        let solution = PseudoflowEngine::new(&network, RunConfig::default())
            .unwrap()
            .run(&mut ctx);
        assert_eq!(solution.max_flow_value(), 1);
        assert!(ctx.stats.gaps > 0);
        assert!(ctx.stats.gap_nodes >= 1);
    }

    #[test]
    fn source_arcs_into_itself_are_ignored() {
        let mut network = FlowNetwork::new(2);
        network
            .add_arc(NodeId::from_raw(1), NodeId::from_raw(1), 4)
            .unwrap();
        network
            .add_arc(NodeId::from_raw(1), NodeId::from_raw(2), 3)
            .unwrap();
        network.set_source(NodeId::from_raw(1)).unwrap();
        network.set_sink(NodeId::from_raw(2)).unwrap();
        let solution = PseudoflowEngine::new(&network, RunConfig::default())
            .unwrap()
            .run(&mut RunContext::default());
        assert_eq!(solution.max_flow_value(), 3);
        assert_eq!(solution.flow_decomposition()[0].flow, 0);
    }
}
