use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use padpack::io::import::import_pack_input;
use padpack::solvers::pack::pack;
use padpack::util::PackSolverConfig;
use padpack_cli::io::read_pack_input;

criterion_main!(benches);
criterion_group!(benches, pack_bench);

const INSTANCES: [&str; 4] = [
    "led_driver",
    "resistor_chain",
    "squared_decoupling",
    "closest_connection",
];

fn pack_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    for name in INSTANCES {
        let path = format!("../assets/{name}.json");
        let ext_input = read_pack_input(Path::new(&path)).expect("benchmark instance should parse");
        let input = import_pack_input(&ext_input).expect("benchmark instance should be valid");
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| pack(input.clone(), PackSolverConfig::default()))
        });
    }
    group.finish();
}
