//! Lexer throughput benchmarks.
//! Run with: `cargo bench --package faxc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_lex::Lexer;
use faxc_util::Handler;

fn lexer_token_count(source: &str) -> usize {
    let handler = Handler::new();
    Lexer::new(source, &handler).tokenize().map(|t| t.len()).unwrap_or(0)
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "int32 main ( ) { int32 y = 1 + 2 ; return y ; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_declaration", |b| {
        b.iter(|| lexer_token_count(black_box("int32 x = 42 ;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        module math {
            int32 fibonacci(int32 n) {
                if (n <= 1) {
                    return n;
                }
                return fibonacci(n - 1) + fibonacci(n - 2);
            }
        }

        class Point {
            public int32 x;
            public int32 y;

            public constructor(int32 x, int32 y) {
                this.x = x;
                this.y = y;
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box("string s = \"hello\" ;")))
    });

    group.bench_function("long_string", |b| {
        let source =
            "string s = \"This is a longer string that contains some text for benchmarking purposes.\" ;";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("int32 x = 123456 ;")))
    });

    group.bench_function("float", |b| {
        b.iter(|| lexer_token_count(black_box("float32 x = 3.14159 ;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("int32 x = 42 ;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("int32 very_long_variable_name = 42 ;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "int32 a = 1 ; int32 b = 2 ; int32 c = 3 ; int32 d = 4 ; int32 e = 5 ;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
