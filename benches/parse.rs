//! Parser throughput benchmarks.

#![allow(missing_docs, clippy::unwrap_used)]

use blockstream::{dispatch_all, parse, parse_batch};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const MESSAGE: &str = r#"Here is a summary of the results.
[BLOCK:{"type":"table","lang":"eng"}]{"headers":["Name","Score"],"rows":[["a","1"],["b","2"]]}[/BLOCK]
Some narrative text between blocks, with [brackets] and "quotes".
[BLOCK:{"type":"code","lang":"rust"}]fn main() { let v = vec![1, 2, 3]; }[/BLOCK]
[BLOCK:{"type":"images","lang":"eng"}]{"images":["https://example.com/a.png"]}[/BLOCK]
"#;

fn transcript(messages: usize) -> String {
    MESSAGE.repeat(messages)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for messages in [1, 16, 256] {
        let input = transcript(messages);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(messages), &input, |b, input| {
            b.iter(|| parse(black_box(input)));
        });
    }
    group.finish();
}

// Unterminated openings and unclosed header strings exercise the bounded
// header lookahead.
fn bench_adversarial(c: &mut Criterion) {
    let input = r#"[BLOCK:{"type":"a"#.repeat(2_000);
    c.bench_function("parse_unterminated", |b| {
        b.iter(|| parse(black_box(&input)));
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let segments = parse(&transcript(16));
    c.bench_function("dispatch_all", |b| {
        b.iter(|| dispatch_all(black_box(&segments)));
    });
}

fn bench_batch(c: &mut Criterion) {
    let messages: Vec<String> = (0..512).map(|_| MESSAGE.to_string()).collect();
    let mut group = c.benchmark_group("batch");
    group.bench_function("sequential", |b| {
        b.iter(|| messages.iter().map(|m| parse(m)).collect::<Vec<_>>());
    });
    group.bench_function("parallel", |b| {
        b.iter(|| parse_batch(black_box(&messages)));
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_adversarial, bench_dispatch, bench_batch);
criterion_main!(benches);
