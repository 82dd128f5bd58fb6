use std::fmt::Write;

use pflow_graph::{gen_layered_network, parse_dimacs};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn parse_bench(c: &mut Criterion) {
    let network = gen_layered_network(40, 50, 4, 100, 42).unwrap();
    let mut text = String::new();
    writeln!(text, "p max {} {}", network.num_nodes(), network.num_arcs()).unwrap();
    writeln!(text, "n {} s", network.source().unwrap()).unwrap();
    writeln!(text, "n {} t", network.sink().unwrap()).unwrap();
    for (_, arc) in network.arcs() {
        writeln!(text, "a {} {} {}", arc.from, arc.to, arc.capacity).unwrap();
    }

    c.bench_function("parse_layered_2k", |b| {
        b.iter(|| {
            black_box(parse_dimacs(&text).unwrap());
        });
    });
}

criterion_group!(benches, parse_bench);
criterion_main!(benches);
