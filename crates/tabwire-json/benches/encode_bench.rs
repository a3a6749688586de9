//! Encoder throughput across orientations and table sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabwire_json::model::{Datum, Index, NdBuffer, Table};
use tabwire_json::{encode, EncodeOptions, Orient};

fn build_table(nrows: usize) -> Datum {
    let columns = Index::new(NdBuffer::from_datums(vec![
        Datum::from("a"),
        Datum::from("b"),
        Datum::from("c"),
    ]))
    .unwrap();
    let index = Index::new(NdBuffer::from_i64((0..nrows as i64).collect())).unwrap();
    let cols = vec![
        NdBuffer::from_i64((0..nrows as i64).collect()),
        NdBuffer::from_f64((0..nrows).map(|i| i as f64 * 0.5).collect()),
        NdBuffer::from_i64((0..nrows as i64).map(|i| i * 7).collect()),
    ];
    Datum::Table(Table::new(columns, index, cols).unwrap())
}

fn bench_orientations(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_table");
    for nrows in [100usize, 1_000] {
        let table = build_table(nrows);
        group.throughput(Throughput::Elements(nrows as u64 * 3));
        for (name, orient) in [
            ("records", Orient::Records),
            ("columns", Orient::Columns),
            ("split", Orient::Split),
            ("values", Orient::Values),
        ] {
            let opts = EncodeOptions::default().with_orient(orient);
            group.bench_with_input(
                BenchmarkId::new(name, nrows),
                &table,
                |b, table| b.iter(|| encode(table, &opts).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_ndarray(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_ndarray");
    let buf = NdBuffer::from_f64((0..10_000).map(|i| f64::from(i) * 0.25).collect())
        .with_shape(vec![100, 100])
        .unwrap();
    let value = Datum::Array(buf);
    let opts = EncodeOptions::default();
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("matrix_100x100", |b| {
        b.iter(|| encode(&value, &opts).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_orientations, bench_ndarray);
criterion_main!(benches);
