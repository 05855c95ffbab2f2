use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
mod common;

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    let doc = common::generate_filled_document(500);

    group.bench_function("export_html", |b| {
        b.iter(|| black_box(doc.export_html()));
    });

    group.bench_function("export_page", |b| {
        b.iter(|| black_box(doc.export_page(black_box("Bench page"))));
    });

    group.finish();
}

criterion_group!(benches, bench_export);
criterion_main!(benches);
