use askpane_core::{inject_links_into_answer, StructuredLink};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn sample_links(n: usize) -> Vec<StructuredLink> {
    (0..n)
        .map(|i| {
            let uri = format!("https://docs.example.com/{}", i);
            StructuredLink::new(uri, format!("Topic {}", i))
        })
        .collect()
}

fn sample_answer(n: usize) -> String {
    (0..n)
        .map(|i| {
            let uri = format!("https://docs.example.com/{}", i);
            format!("Topic {i} explains part {i}. See Topic {i}: ({uri})\n")
        })
        .collect()
}

fn bench_inject_10_links(c: &mut Criterion) {
    let links = sample_links(10);
    let answer = sample_answer(10);

    c.bench_function("inject_10_links", |b| {
        b.iter(|| inject_links_into_answer(black_box(&answer), black_box(&links)));
    });
}

fn bench_inject_50_links_long_answer(c: &mut Criterion) {
    let links = sample_links(50);
    let answer = sample_answer(200);

    c.bench_function("inject_50_links_long_answer", |b| {
        b.iter(|| inject_links_into_answer(black_box(&answer), black_box(&links)));
    });
}

criterion_group!(
    benches,
    bench_inject_10_links,
    bench_inject_50_links_long_answer
);
criterion_main!(benches);
