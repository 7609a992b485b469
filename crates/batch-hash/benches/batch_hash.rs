//! crates/batch-hash/benches/batch_hash.rs
//!
//! Throughput of the lane-parallel hashes on every usable backend, next to
//! the one-at-a-time RustCrypto implementations as a baseline.
//!
//! Run with: `cargo bench -p batch-hash`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use batch_hash::{Dispatcher, Input};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

const INPUTS: usize = 4096;

fn inputs() -> Vec<Input> {
    (0..INPUTS as u32)
        .map(|i| {
            let mut input = [0u8; 32];
            input[..4].copy_from_slice(&i.to_le_bytes());
            input
        })
        .collect()
}

fn bench_kernel<D, R>(
    c: &mut Criterion,
    name: &str,
    hash: impl Fn(&Dispatcher, &[Input]) -> Vec<D>,
    reference: impl Fn(&Input) -> R,
) {
    let inputs = inputs();
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(INPUTS as u64));

    group.bench_with_input(BenchmarkId::from_parameter("rustcrypto"), &inputs, |b, inputs| {
        b.iter(|| {
            for input in black_box(inputs) {
                black_box(reference(input));
            }
        });
    });

    for backend in Dispatcher::available() {
        let Ok(dispatcher) = Dispatcher::with_backend(backend) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(backend), &inputs, |b, inputs| {
            b.iter(|| black_box(hash(&dispatcher, black_box(inputs))));
        });
    }

    group.finish();
}

fn bench_sha256(c: &mut Criterion) {
    bench_kernel(c, "sha256", |dispatcher, inputs| dispatcher.sha256_many(inputs), |input| {
        Sha256::digest(input)
    });
}

fn bench_ripemd160(c: &mut Criterion) {
    bench_kernel(c, "ripemd160", |dispatcher, inputs| dispatcher.ripemd160_many(inputs), |input| {
        Ripemd160::digest(input)
    });
}

fn bench_hash160(c: &mut Criterion) {
    bench_kernel(c, "hash160", |dispatcher, inputs| dispatcher.hash160_many(inputs), |input| {
        Ripemd160::digest(Sha256::digest(input))
    });
}

criterion_group!(benches, bench_sha256, bench_ripemd160, bench_hash160);
criterion_main!(benches);
