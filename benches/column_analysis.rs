use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use csv_audit::consistency::analyze;

fn generate_column(rows: usize) -> Vec<Option<String>> {
    (0..rows)
        .map(|i| match i % 5 {
            0 => None,
            1 => Some(format!("{}.{}", i, i % 100)),
            2 => Some(format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1)),
            3 => Some(format!("{:02}/{:02}/2023", (i % 28) + 1, (i % 12) + 1)),
            _ => Some(format!("item-{i}")),
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_column");
    for rows in [1_000usize, 10_000, 100_000] {
        let column = generate_column(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &column, |b, column| {
            b.iter(|| analyze(column.iter().map(|cell| cell.as_deref())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
