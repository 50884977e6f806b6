//! Performance benchmarks for subdex
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use subdex::index::SubstringIndex;
use subdex::query::{NameSearch, SearchOptions, SortOrder};

/// Deterministic path-like names, e.g. `src/mod_17/widget_1234.rs`
fn sample_names(count: usize) -> Vec<String> {
    const STEMS: &[&str] = &["widget", "parser", "config", "handler", "index", "reader"];
    const EXTS: &[&str] = &["rs", "toml", "md", "json"];

    (0..count)
        .map(|i| {
            format!(
                "src/mod_{}/{}_{}.{}",
                i % 97,
                STEMS[i % STEMS.len()],
                i,
                EXTS[(i / 7) % EXTS.len()]
            )
        })
        .collect()
}

fn build(names: &[String], k: usize, support_remove: bool) -> SubstringIndex {
    let mut index = SubstringIndex::new(k, support_remove);
    index.extend(names);
    index
}

fn bench_insert(c: &mut Criterion) {
    let names = sample_names(10_000);

    let mut group = c.benchmark_group("insert_10k");
    for k in [2, 3, 4] {
        for support_remove in [false, true] {
            let id = format!("k{}_remove_{}", k, support_remove);
            group.bench_function(BenchmarkId::from_parameter(id), |b| {
                b.iter(|| build(black_box(&names), k, support_remove))
            });
        }
    }
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let names = sample_names(50_000);
    let index = build(&names, 3, false);
    let queries = ["a", "rs", "par", "widget", "mod_42/", "handler_4999", "nothing-here"];

    let mut group = c.benchmark_group("find_50k");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &q| {
            let mut out = Vec::new();
            b.iter(|| {
                index.find_into(black_box(q), &mut out);
                out.len()
            })
        });
    }
    group.finish();
}

fn bench_search_sorted(c: &mut Criterion) {
    let names = sample_names(50_000);
    let index = build(&names, 3, false);

    let mut group = c.benchmark_group("search_sorted_50k");
    for sort in [SortOrder::Unsorted, SortOrder::Lexical, SortOrder::UxCaseInsensitive] {
        let options = SearchOptions { sort, limit: 100 };
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", sort)),
            &options,
            |b, options| {
                let mut search = NameSearch::new(&index);
                b.iter(|| search.execute(black_box("config"), options).total)
            },
        );
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let names = sample_names(5_000);

    c.bench_function("remove_half_5k", |b| {
        b.iter_batched(
            || build(&names, 3, true),
            |mut index| {
                for name in names.iter().step_by(2) {
                    index.remove(name);
                }
                index
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_scan_cost(c: &mut Criterion) {
    let names = sample_names(50_000);
    let index = build(&names, 3, false);

    c.bench_function("num_search_names", |b| {
        b.iter(|| index.num_search_names(black_box("src/mod_1/reader_")))
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_find,
    bench_search_sorted,
    bench_remove,
    bench_scan_cost,
);
criterion_main!(benches);
