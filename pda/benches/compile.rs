fn json() {
  let input = include_str!("../tests/fixtures/json.grammar");
  let rules = grammar::build(input).unwrap();
  let _automaton = pda::build(&rules, 0, true).unwrap();
}

use criterion::{criterion_group, criterion_main, Criterion};

fn json_benchmark(c: &mut Criterion) {
  c.bench_function("json", |b| b.iter(|| json()));
}

criterion_group!{
  name = benches;
  config = Criterion::default().significance_level(0.1).sample_size(10);
  targets = json_benchmark
}
criterion_main!(benches);
