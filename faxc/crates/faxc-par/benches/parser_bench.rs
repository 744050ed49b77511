//! Parser throughput benchmarks.
//! Run with: `cargo bench --package faxc-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_lex::Lexer;
use faxc_par::Parser;
use faxc_util::Handler;

fn parse_item_count(source: &str) -> usize {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize().expect("lex failed");
    Parser::new(tokens, &handler)
        .parse()
        .map(|items| items.len())
        .unwrap_or(0)
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "int32 x = 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("declaration", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        int32 main() {
            int32 x = 42;
            int32 y = x + 1;
            return y;
        }

        int32 fib(int32 n) {
            if (n <= 1) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("functions", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_parser_classes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_classes");

    let source = r#"
        class Point {
            public int32 x;
            public int32 y;

            public constructor(int32 x, int32 y) {
                this.x = x;
                this.y = y;
            }
        }

        class Rectangle {
            private int32 width;
            private int32 height;

            public int32 area() {
                return width * height;
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("classes", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_parser_modules(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_modules");

    let source = r#"
        module math {
            int32 square(int32 n) {
                return n * n;
            }

            int32 cube(int32 n) {
                return n * n * n;
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("modules", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        int32 process(int32 n) {
            if (n < 0) {
                return -1;
            } else {
                if (n == 0) {
                    return 0;
                } else {
                    int32 sum = 0;
                    int32 i = 0;
                    while (i < n) {
                        sum += i;
                        i += 1;
                    }
                    return sum;
                }
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("control_flow", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        use std.io;

        module shapes {
            class Point {
                public int32 x;
                public int32 y;

                public constructor(int32 x, int32 y) {
                    this.x = x;
                    this.y = y;
                }

                public int32 distanceTo(int32 ox, int32 oy) {
                    int32 dx = x - ox;
                    int32 dy = y - oy;
                    return dx * dx + dy * dy;
                }
            }
        }

        int32 main() {
            int32 result = shapes.Point.distanceTo(1, 2);
            return result as int32;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| parse_item_count(black_box(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_classes,
    bench_parser_modules,
    bench_parser_control_flow,
    bench_parser_complex
);
criterion_main!(benches);
