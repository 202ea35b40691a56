use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use crossreduce::reorder;

/// Two ranks of `n` nodes each, wired as a full reversal (`n` crossing pairs
/// per node), which forces every barycenter pass to actually propose a
/// change. Node ids are globally unique: rank 0 is `0..n`, rank 1 is `n..2n`.
fn reversed_bilayer_buffer(n: i32) -> Vec<i32> {
    let mut buf = Vec::new();
    buf.push(n);
    buf.extend(0..n);
    buf.push(n);
    buf.extend(n..2 * n);
    buf.push(n);
    for i in 0..n {
        buf.push(i);
        buf.push(n + (n - 1 - i));
        buf.push(1);
    }
    buf
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder_reversed_bilayer");
    for &n in &[8, 32, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let template = reversed_bilayer_buffer(n);
            b.iter(|| {
                let mut buffer = template.clone();
                reorder(2, (2 * n) as usize, n as usize, black_box(&mut buffer)).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reorder);
criterion_main!(benches);
