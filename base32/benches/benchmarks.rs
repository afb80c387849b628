//! Benchmarks comparing the buffer codec with the external base32 crate.

use base32::{decode_into, encode, encode_into, encoded_len, max_decoded_len, LENIENT};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

/// Sample data sizes for benchmarking, up to the 512 KiB harness buffer.
const SIZES: &[usize] = &[16, 256, 4096, 65536, 512 * 1024];

fn generate_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i.wrapping_mul(31) % 256) as u8).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base32_encode");

    for &size in SIZES {
        let data = generate_data(size);
        let mut output = vec![0u8; encoded_len(size).unwrap()];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode_into", size), &data, |b, data| {
            b.iter(|| encode_into(black_box(data), black_box(&mut output)))
        });

        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| encode(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("base32_crate", size), &data, |b, data| {
            b.iter(|| {
                base32_external::encode(
                    base32_external::Alphabet::Rfc4648 { padding: true },
                    black_box(data),
                )
            })
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base32_decode");

    for &size in SIZES {
        let encoded = encode(&generate_data(size));
        let mut output = vec![0u8; max_decoded_len(encoded.len())];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("decode_into", size),
            &encoded,
            |b, encoded| b.iter(|| decode_into(black_box(encoded.as_bytes()), &mut output)),
        );

        group.bench_with_input(
            BenchmarkId::new("decode_lenient", size),
            &encoded,
            |b, encoded| b.iter(|| LENIENT.decode(black_box(encoded))),
        );

        group.bench_with_input(
            BenchmarkId::new("base32_crate", size),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    base32_external::decode(
                        base32_external::Alphabet::Rfc4648 { padding: true },
                        black_box(encoded),
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
