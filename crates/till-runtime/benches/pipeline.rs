//! Pipeline benchmarks
//!
//! Measures each phase on canonical programs:
//! - Lexing with layout tokens
//! - Parsing
//! - Full run (check and interpret)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use till_runtime::{Lexer, Parser, Till};

const LOOP: &str = "\
Num sum = 0
Num i = 0
while i < 10000
    sum = sum + i
    i = i + 1
display sum
";

const FIB: &str = "\
fib(Num n) -> Num
    if n < 2
        return n
    return fib(n - 1) + fib(n - 2)
display fib(18)
";

fn bench_lex(c: &mut Criterion) {
    let source = FIB.repeat(50);
    c.bench_function("lex_fib_x50", |b| {
        b.iter(|| Lexer::new(black_box(&source)).tokenize())
    });
}

fn bench_parse(c: &mut Criterion) {
    let tokens = Lexer::new(LOOP).tokenize().expect("benchmark source lexes");
    c.bench_function("parse_loop", |b| {
        b.iter(|| Parser::new(black_box(tokens.clone())).parse())
    });
}

fn bench_run(c: &mut Criterion) {
    let till = Till::new();
    c.bench_function("run_arithmetic_loop_10k", |b| {
        b.iter(|| till.run(black_box(LOOP)))
    });
    c.bench_function("run_fibonacci_18", |b| b.iter(|| till.run(black_box(FIB))));
}

criterion_group!(benches, bench_lex, bench_parse, bench_run);
criterion_main!(benches);
