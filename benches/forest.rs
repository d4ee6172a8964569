use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rowtree::debug::{GenRow, RowGen};
use rowtree::{FnMapper, Traversal, TreeTable};

fn count_forest(rows: Vec<GenRow>, traversal: Traversal) -> usize {
    let mapper = FnMapper::new(
        |_: &GenRow, _: usize, _: Option<&usize>| 1usize,
        |node: &mut usize, children: Option<Vec<usize>>| {
            *node += children.into_iter().flatten().sum::<usize>();
        },
    );
    TreeTable::from_records(rows, mapper)
        .traversal(traversal)
        .into_forest()
        .unwrap()
        .into_iter()
        .sum()
}

pub fn bench_forest(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(1991);
    let mut group = c.benchmark_group("forest");

    for n_rows in [1_000, 100_000] {
        let rows = RowGen::new(n_rows, 0.001, 0.4, 0.5).gen(&mut rng);
        for traversal in [Traversal::Recursive, Traversal::Iterative] {
            group.bench_with_input(
                BenchmarkId::new(format!("{traversal:?}"), n_rows),
                &rows,
                |b, rows| b.iter(|| count_forest(black_box(rows.clone()), traversal)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_forest);
criterion_main!(benches);
