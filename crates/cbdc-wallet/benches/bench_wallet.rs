// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK SUITE — cbdc-wallet
//
// Measures performance of the offline-transfer lifecycle.
// ZERO production code changes — benchmark-only file.
// Run: cargo bench -p cbdc-wallet
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use cbdc_crypto::Secret;
use cbdc_wallet::Wallet;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_create_offline_transfer(c: &mut Criterion) {
    let secret = Secret::from_str("bench-secret");
    c.bench_function("wallet/create_offline_transfer", |b| {
        b.iter(|| {
            let mut wallet = Wallet::new("owner-1");
            wallet.activate_offline(0, 14);
            wallet.notify_credit(1_000, None, None, 0);
            wallet.withdraw_to_offline(1_000, 1_000_000, 1).unwrap();
            black_box(wallet.create_offline_transfer("owner-2", 10, &secret, 2).unwrap())
        })
    });
}

fn bench_confirm_pending(c: &mut Criterion) {
    let secret = Secret::from_str("bench-secret");
    c.bench_function("wallet/confirm_pending", |b| {
        b.iter(|| {
            let mut wallet = Wallet::new("owner-1");
            wallet.activate_offline(0, 14);
            wallet.notify_credit(1_000, None, None, 0);
            wallet.withdraw_to_offline(1_000, 1_000_000, 1).unwrap();
            let tx = wallet.create_offline_transfer("owner-2", 10, &secret, 2).unwrap();
            black_box(wallet.confirm_pending(&tx.id, &"a".repeat(64), 3).unwrap())
        })
    });
}

criterion_group!(benches, bench_create_offline_transfer, bench_confirm_pending);
criterion_main!(benches);
