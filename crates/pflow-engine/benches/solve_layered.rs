use pflow_core::RunConfig;
use pflow_engine::{solve, RunContext};
use pflow_graph::gen_layered_network;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn solve_bench(c: &mut Criterion) {
    let network = gen_layered_network(40, 50, 4, 100, 7).unwrap();
    for config in RunConfig::policy_grid(false) {
        let name = format!(
            "solve_layered_2k_{:?}_{:?}",
            config.label_order(),
            config.bucket_order()
        )
        .to_lowercase();
        c.bench_function(&name, |b| {
            b.iter(|| {
                let mut ctx = RunContext::default();
                black_box(solve(&network, config, &mut ctx).unwrap().max_flow_value());
            });
        });
    }
}

criterion_group!(benches, solve_bench);
criterion_main!(benches);
