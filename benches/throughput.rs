//! Throughput Benchmark for respd
//!
//! This benchmark measures decoding and dispatch performance on
//! in-memory request streams.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use respd::commands::dispatch;
use respd::protocol::{RespDecoder, RespValue};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

fn request(parts: &[&str]) -> Vec<u8> {
    RespValue::array(parts.iter().map(|p| RespValue::bulk_string(*p)).collect())
        .serialize()
        .to_vec()
}

/// Benchmark decoding single requests
fn bench_decode(c: &mut Criterion) {
    let rt = runtime();
    let decoder = RespDecoder::new();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    let ping = request(&["PING"]);
    group.bench_function("decode_ping", |b| {
        b.iter(|| {
            let mut input: &[u8] = &ping;
            black_box(rt.block_on(decoder.decode(&mut input)).unwrap());
        });
    });

    let large = "x".repeat(64 * 1024);
    let echo_large = request(&["ECHO", large.as_str()]);
    group.bench_function("decode_echo_64k", |b| {
        b.iter(|| {
            let mut input: &[u8] = &echo_large;
            black_box(rt.block_on(decoder.decode(&mut input)).unwrap());
        });
    });

    group.finish();
}

/// Benchmark a batch of back-to-back requests, decode and dispatch
fn bench_pipeline(c: &mut Criterion) {
    let rt = runtime();
    let decoder = RespDecoder::new();

    let batch_size = 1000;
    let mut batch = Vec::new();
    for i in 0..batch_size {
        if i % 2 == 0 {
            batch.extend_from_slice(&request(&["PING"]));
        } else {
            batch.extend_from_slice(&request(&["ECHO", "hello"]));
        }
    }

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(batch_size as u64));

    group.bench_function("decode_dispatch_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut input: &[u8] = &batch;
                while !input.is_empty() {
                    let value = decoder.decode(&mut input).await.unwrap();
                    black_box(dispatch(value).unwrap().serialize());
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_pipeline);
criterion_main!(benches);
