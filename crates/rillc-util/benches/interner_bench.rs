//! Interner throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rillc_util::{Arena, StrInterner};

fn bench_intern_fresh(c: &mut Criterion) {
    let keys: Vec<String> = (0..1000).map(|i| format!("ident_{i}")).collect();
    c.bench_function("intern_1000_fresh", |b| {
        b.iter(|| {
            let arena = Arena::new();
            let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
            for k in &keys {
                black_box(interner.intern(k, ()));
            }
        })
    });
}

fn bench_intern_hits(c: &mut Criterion) {
    let arena = Arena::new();
    let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
    let keys: Vec<String> = (0..1000).map(|i| format!("ident_{i}")).collect();
    for k in &keys {
        interner.intern(k, ());
    }
    c.bench_function("intern_1000_hits", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(interner.peek(k));
            }
        })
    });
}

criterion_group!(benches, bench_intern_fresh, bench_intern_hits);
criterion_main!(benches);
