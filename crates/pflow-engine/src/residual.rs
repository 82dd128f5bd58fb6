use pflow_core::Capacity;
use pflow_graph::FlowNetwork;

/// Residual arcs of a network stored as flat arrays.
///
/// Original arc `a` owns residual arcs `2a` (forward, starts at its capacity)
/// and `2a + 1` (reverse, starts at zero); an arc's mate is `r ^ 1`. Each
/// node's residual list holds, in arc insertion order, the forward residual
/// of every arc it tails and the reverse residual of every arc it heads.
#[derive(Debug, Clone)]
pub(crate) struct ResidualGraph {
    head: Vec<usize>,
    residual: Vec<Capacity>,
    capacity: Vec<Capacity>,
    offsets: Vec<usize>,
    adjacency: Vec<usize>,
}

impl ResidualGraph {
    pub(crate) fn build(network: &FlowNetwork) -> Self {
        let num_nodes = network.num_nodes();
        let num_arcs = network.num_arcs();
        let mut head = Vec::with_capacity(2 * num_arcs);
        let mut residual = Vec::with_capacity(2 * num_arcs);
        let mut capacity = Vec::with_capacity(num_arcs);
        let mut degree = vec![0usize; num_nodes];

        for (from, to, cap) in network.raw_arcs() {
            head.push(to);
            residual.push(cap);
            head.push(from);
            residual.push(0);
            capacity.push(cap);
            degree[from] += 1;
            degree[to] += 1;
        }

        let mut offsets = Vec::with_capacity(num_nodes + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        let mut fill = offsets[..num_nodes].to_vec();
        let mut adjacency = vec![0usize; 2 * num_arcs];
        for arc in 0..num_arcs {
            let forward = 2 * arc;
            let reverse = forward + 1;
            let from = head[reverse];
            let to = head[forward];
            adjacency[fill[from]] = forward;
            fill[from] += 1;
            adjacency[fill[to]] = reverse;
            fill[to] += 1;
        }

        Self {
            head,
            residual,
            capacity,
            offsets,
            adjacency,
        }
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    pub(crate) fn num_arcs(&self) -> usize {
        self.capacity.len()
    }

    /// Residual arc at position `cursor` of `node`'s list.
    pub(crate) fn arc_at(&self, node: usize, cursor: usize) -> Option<usize> {
        let position = self.offsets[node] + cursor;
        if position < self.offsets[node + 1] {
            Some(self.adjacency[position])
        } else {
            None
        }
    }

    pub(crate) fn arcs_from(&self, node: usize) -> &[usize] {
        &self.adjacency[self.offsets[node]..self.offsets[node + 1]]
    }

    pub(crate) fn head(&self, arc: usize) -> usize {
        self.head[arc]
    }

    pub(crate) fn tail(&self, arc: usize) -> usize {
        self.head[arc ^ 1]
    }

    pub(crate) fn residual(&self, arc: usize) -> Capacity {
        self.residual[arc]
    }

    pub(crate) fn is_forward(arc: usize) -> bool {
        arc & 1 == 0
    }

    /// Moves `delta` units along residual arc `arc`.
    pub(crate) fn push(&mut self, arc: usize, delta: Capacity) {
        debug_assert!(delta >= 0 && delta <= self.residual[arc]);
        self.residual[arc] -= delta;
        self.residual[arc ^ 1] += delta;
    }

    pub(crate) fn capacity(&self, original: usize) -> Capacity {
        self.capacity[original]
    }

    /// Net flow on original arc `original`, clamped at zero.
    pub(crate) fn flow(&self, original: usize) -> Capacity {
        (self.capacity[original] - self.residual[2 * original]).max(0)
    }

    /// Endpoints of original arc `original` as storage indices.
    pub(crate) fn endpoints(&self, original: usize) -> (usize, usize) {
        let forward = 2 * original;
        (self.tail(forward), self.head(forward))
    }
}
