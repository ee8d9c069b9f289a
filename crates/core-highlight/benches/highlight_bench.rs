use core_highlight::{Highlighter, Marker, highlight};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn page(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| format!("[{i:05}] step {i}: compiling module_{i} (warning: unused import)"))
        .collect()
}

fn bench_highlight(c: &mut Criterion) {
    let lines = page(100);
    c.bench_function("highlight_page_per_line_compile", |b| {
        b.iter(|| {
            for l in &lines {
                black_box(highlight(black_box(l), "warning"));
            }
        })
    });
    let h = Highlighter::new("warning", Marker::default())
        .unwrap()
        .unwrap();
    c.bench_function("highlight_page_compiled", |b| {
        b.iter(|| {
            for l in &lines {
                black_box(h.apply(black_box(l)));
            }
        })
    });
}

criterion_group!(benches, bench_highlight);
criterion_main!(benches);
