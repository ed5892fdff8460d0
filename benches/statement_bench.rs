use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fixture_book_gen::company_sheet;
use sheet_fixture::sheet::{decode_rows, SheetLayout};
use sheet_fixture::statement::build_insert_sql;
use sheet_fixture::{DefaultColumn, FixtureTable};
use std::hint::black_box;

fn company_table(rows: usize) -> FixtureTable {
    let grid = company_sheet(rows).to_grid();
    decode_rows(&SheetLayout::CURRENT, "company", &grid).unwrap()
}

fn bench_build_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_insert_sql");

    for rows in [10, 100, 1_000, 10_000] {
        let table = company_table(rows);

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| build_insert_sql(black_box(table)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_rows");

    for rows in [100, 10_000] {
        let grid = company_sheet(rows).to_grid();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &grid, |b, grid| {
            b.iter(|| decode_rows(&SheetLayout::CURRENT, "company", black_box(grid)).unwrap())
        });
    }

    group.finish();
}

fn bench_merge_defaults(c: &mut Criterion) {
    let defaults = vec![
        DefaultColumn::new("revision", "0"),
        DefaultColumn::new("deleted", "false"),
        DefaultColumn::new("created_by", "x"),
    ];
    let table = company_table(10_000);

    c.bench_function("merge_defaults_10000_rows", |b| {
        b.iter(|| {
            let mut copy = table.clone();
            copy.merge_defaults(black_box(&defaults));
            copy
        })
    });
}

criterion_group!(benches, bench_build_insert, bench_decode, bench_merge_defaults);
criterion_main!(benches);
