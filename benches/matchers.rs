extern crate criterion;
extern crate fano;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fano::{decode::Decoder, encode::Encoder, CodeTable};

/// Deterministic input with a skewed distribution over `alphabet` symbols.
fn sample(len: usize, alphabet: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            // Squaring favours small values.
            let pick = (state % alphabet) * (state % alphabet) / alphabet;
            pick as u8
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion, alphabet: u32) {
    let data = sample(1 << 16, alphabet);
    let table = CodeTable::from_data(&data).expect("Sample is not empty");
    let packed = Encoder::new(&table).encode(&data).expect("Table covers the sample");

    let mut group = c.benchmark_group(format!("decode-{}", alphabet));
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(BenchmarkId::new("scan", data.len()), &packed, |b, packed| {
        let decoder = Decoder::new(&table);
        b.iter(|| black_box(decoder.decode(packed).expect("Error")))
    });
    group.bench_with_input(BenchmarkId::new("tree", data.len()), &packed, |b, packed| {
        let decoder = Decoder::with_tree_walk(&table);
        b.iter(|| black_box(decoder.decode(packed).expect("Error")))
    });
    group.finish();
}

pub fn bench_encode(c: &mut Criterion) {
    let data = sample(1 << 16, 256);
    let table = CodeTable::from_data(&data).expect("Sample is not empty");
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_with_input(BenchmarkId::new("table", data.len()), &data, |b, data| {
        b.iter(|| black_box(CodeTable::from_data(data).expect("Error")))
    });
    group.bench_with_input(BenchmarkId::new("pack", data.len()), &data, |b, data| {
        let encoder = Encoder::new(&table);
        b.iter(|| black_box(encoder.encode(data).expect("Error")))
    });
    group.finish();
}

pub fn bench_small_alphabet(c: &mut Criterion) {
    criterion_benchmark(c, 16);
}

pub fn bench_full_alphabet(c: &mut Criterion) {
    criterion_benchmark(c, 256);
}

criterion_group!(benches, bench_encode, bench_small_alphabet, bench_full_alphabet);
criterion_main!(benches);
