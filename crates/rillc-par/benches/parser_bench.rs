//! Parser throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rillc_util::{Arena, Diagnostics};

fn synthetic_source(functions: usize) -> String {
    let mut src = String::new();
    src.push_str("limit: i32 = 100;\n");
    for i in 0..functions {
        src.push_str(&format!(
            "fn step_{i}(a: i32, b: f64) -> i32 {{\n\
             \tacc: i32 = 0;\n\
             \tfor j: i32 = 0; j < limit; j += 1 {{\n\
             \t\tif j % 2 == 0 {{ acc += j; }} else {{ acc -= 1; }}\n\
             \t}}\n\
             \treturn acc + a;\n\
             }}\n"
        ));
    }
    src
}

fn bench_parser(c: &mut Criterion) {
    let source = synthetic_source(100);
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("parse_100_functions", |b| {
        b.iter(|| {
            let arena = Arena::new();
            let mut diags = Diagnostics::new("bench.rl");
            let lexed = rillc_lex::lex(&arena, black_box(&source), &mut diags);
            let program = rillc_par::parse(&lexed.tokens, &mut diags);
            black_box(program.map(|p| p.decls.len()))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
