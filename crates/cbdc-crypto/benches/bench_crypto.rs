// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK SUITE — cbdc-crypto
//
// Measures the keyed-MAC and content-hash primitives: every submitted
// transaction signs once and every post-commit hook verifies once, so
// these are on the authority's hot path.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use cbdc_crypto::{compute_keyed_mac, content_hash, verify_keyed_mac, Secret};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_mac(c: &mut Criterion) {
    let secret = Secret::from_str("authority-shared-secret");
    let mut group = c.benchmark_group("crypto/compute_keyed_mac");

    for field_count in [1, 4, 8] {
        let fields: Vec<Vec<u8>> = (0..field_count).map(|i| format!("field-{i}").into_bytes()).collect();
        let refs: Vec<&[u8]> = fields.iter().map(|f| f.as_slice()).collect();

        group.bench_with_input(BenchmarkId::new("fields", field_count), &refs, |b, refs| {
            b.iter(|| black_box(compute_keyed_mac(&secret, refs)))
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let secret = Secret::from_str("authority-shared-secret");
    let fields: Vec<&[u8]> = vec![b"alice", b"bob", b"1000", b"1700000000"];
    let tag = compute_keyed_mac(&secret, &fields);

    c.bench_function("crypto/verify_keyed_mac", |b| {
        b.iter(|| black_box(verify_keyed_mac(&secret, &fields, &tag)))
    });
}

fn bench_content_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("crypto/content_hash");

    for size in [64, 512, 4096] {
        let bytes = vec![0xABu8; size];
        group.bench_with_input(BenchmarkId::new("bytes", size), &bytes, |b, bytes| {
            b.iter(|| black_box(content_hash(bytes)))
        });
    }
    group.finish();
}

fn bench_sign_then_verify_roundtrip(c: &mut Criterion) {
    let secret = Secret::from_str("authority-shared-secret");
    let fields: Vec<&[u8]> = vec![b"alice", b"bob", b"1000", b"1700000000"];

    c.bench_function("crypto/mac_then_verify (TPS estimate)", |b| {
        b.iter(|| {
            let tag = compute_keyed_mac(&secret, &fields);
            black_box(verify_keyed_mac(&secret, &fields, &tag))
        })
    });
}

criterion_group!(
    benches,
    bench_mac,
    bench_verify,
    bench_content_hash,
    bench_sign_then_verify_roundtrip,
);
criterion_main!(benches);
