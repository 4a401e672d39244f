//! Typing benchmarks for weft.
//!
//! Measures the cost of keeping a large document up to date while a
//! user types into it, against parsing it from scratch.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use weft_parse::SyntaxTree;
use weftc::{Document, WeftConfig};

/// `n` classes with a few members each.
fn generate_classes(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "/** Class {i}. */\nclass C{i} extends Base {{\n    \
                 private int count{i} = {i};\n    \
                 void run(int by) {{\n        \
                 for (int j = 0; j < by; j++) {{ count{i} += j; }}\n        \
                 if (count{i} > 10) {{ reset(); }} else {{ grow(by); }}\n    \
                 }}\n}}\n"
            )
        })
        .collect()
}

fn bench_fresh_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [10, 100, 1000] {
        let source = generate_classes(size);
        group.bench_with_input(BenchmarkId::new("classes", size), &source, |b, src| {
            b.iter(|| black_box(SyntaxTree::parse(src)));
        });
    }
    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    for size in [10, 100, 1000] {
        let source = generate_classes(size);
        // Middle of the document, inside a method body.
        let pos = source.find(&format!("count{} += j", size / 2)).unwrap_or(0);
        group.bench_with_input(BenchmarkId::new("keystroke", size), &source, |b, src| {
            b.iter_batched(
                || Document::new(src.clone(), WeftConfig::default()),
                |mut doc| {
                    let _ = doc.apply_edit(pos, 0, "x");
                    black_box(doc)
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("open_brace", size), &source, |b, src| {
            b.iter_batched(
                || Document::new(src.clone(), WeftConfig::default()),
                |mut doc| {
                    let _ = doc.apply_edit(pos, 0, "{");
                    black_box(doc)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_completion(c: &mut Criterion) {
    let source = format!("{}class Client {{ C1 c; void f() {{ c. }} }}\n", generate_classes(100));
    let pos = source.find("c. }").map_or(0, |p| p + 2);
    let mut doc = Document::new(source, WeftConfig::default());

    c.bench_function("complete/member_access", |b| {
        b.iter(|| black_box(doc.expression_type(pos)));
    });
}

criterion_group!(benches, bench_fresh_parse, bench_typing, bench_completion);
criterion_main!(benches);
