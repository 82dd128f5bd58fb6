use std::collections::VecDeque;

use pflow_core::rng::RngHandle;
use pflow_core::RunConfig;
use pflow_engine::{solve, RunContext, Solution};
use pflow_graph::{gen_layered_network, gen_random_network, FlowNetwork};
use proptest::prelude::*;

/// Edmonds-Karp on a dense residual matrix; parallel arcs are summed.
fn reference_max_flow(network: &FlowNetwork) -> i64 {
    let n = network.num_nodes();
    let (source, sink) = network.terminal_indices().unwrap();
    let mut residual = vec![vec![0i64; n]; n];
    for (from, to, cap) in network.raw_arcs() {
        if from != to {
            residual[from][to] += cap;
        }
    }
    let mut total = 0;
    loop {
        let mut parent = vec![usize::MAX; n];
        parent[source] = source;
        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            for v in 0..n {
                if parent[v] == usize::MAX && residual[u][v] > 0 {
                    parent[v] = u;
                    queue.push_back(v);
                }
            }
        }
        if parent[sink] == usize::MAX {
            return total;
        }
        let mut bottleneck = i64::MAX;
        let mut v = sink;
        while v != source {
            bottleneck = bottleneck.min(residual[parent[v]][v]);
            v = parent[v];
        }
        let mut v = sink;
        while v != source {
            let u = parent[v];
            residual[u][v] -= bottleneck;
            residual[v][u] += bottleneck;
            v = u;
        }
        total += bottleneck;
    }
}

fn assert_feasible(network: &FlowNetwork, solution: &Solution) {
    let (source, sink) = network.terminal_indices().unwrap();
    let mut balance = vec![0i64; network.num_nodes()];
    for arc in solution.flow_decomposition() {
        assert!(arc.flow >= 0 && arc.flow <= arc.capacity, "{arc:?}");
        balance[arc.from.index().unwrap()] -= arc.flow;
        balance[arc.to.index().unwrap()] += arc.flow;
    }
    for (node, &b) in balance.iter().enumerate() {
        if node != source && node != sink {
            assert_eq!(b, 0, "conservation violated at node {}", node + 1);
        }
    }
    assert_eq!(balance[sink], solution.max_flow_value());
    assert_eq!(-balance[source], solution.max_flow_value());
}

fn assert_dual(solution: &Solution) {
    let cut = solution.min_cut();
    assert_eq!(cut.capacity, solution.max_flow_value());
    assert!(cut.contains(solution.source()));
    assert!(!cut.contains(solution.sink()));
    let crossing: i64 = cut.crossing_arcs.iter().map(|arc| arc.capacity).sum();
    assert_eq!(crossing, cut.capacity);
}

#[test]
fn layered_networks_agree_across_policies() {
    for seed in 0..4 {
        let network = gen_layered_network(6, 8, 3, 40, seed).unwrap();
        let expected = reference_max_flow(&network);
        for config in RunConfig::policy_grid(false) {
            let mut ctx = RunContext::default();
            let solution = solve(&network, config, &mut ctx).unwrap();
            assert_eq!(solution.max_flow_value(), expected, "seed {seed} {config:?}");
            assert_feasible(&network, &solution);
            assert_dual(&solution);
        }
    }
}

#[test]
fn zero_capacity_arcs_carry_nothing() {
    let mut rng = RngHandle::from_seed(11);
    let network = gen_random_network(12, 40, 0, &mut rng).unwrap();
    let solution = solve(&network, RunConfig::default(), &mut RunContext::default()).unwrap();
    assert_eq!(solution.max_flow_value(), 0);
    assert_eq!(solution.min_cut().capacity, 0);
    assert_feasible(&network, &solution);
}

proptest! {
    #[test]
    fn matches_augmenting_path_reference(
        seed in any::<u64>(),
        nodes in 2usize..12,
        arcs in 0usize..40,
        max_capacity in 0i64..20,
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let network = gen_random_network(nodes, arcs, max_capacity, &mut rng).unwrap();
        let expected = reference_max_flow(&network);
        for config in RunConfig::policy_grid(false) {
            let mut ctx = RunContext::default();
            let solution = solve(&network, config, &mut ctx).unwrap();
            prop_assert_eq!(solution.max_flow_value(), expected);
            assert_feasible(&network, &solution);
            assert_dual(&solution);
        }
    }

    #[test]
    fn extraction_does_not_depend_on_call_count(seed in any::<u64>(), nodes in 2usize..10) {
        let mut rng = RngHandle::from_seed(seed);
        let network = gen_random_network(nodes, 3 * nodes, 9, &mut rng).unwrap();
        let solution = solve(&network, RunConfig::default(), &mut RunContext::default()).unwrap();
        let first = (solution.min_cut(), solution.flow_decomposition());
        let second = (solution.min_cut(), solution.flow_decomposition());
        prop_assert_eq!(first, second);
    }
}
