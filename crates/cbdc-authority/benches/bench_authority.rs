use cbdc_authority::{OwnerCategory, SettlementAuthority};
use cbdc_core::SystemConfig;
use cbdc_crypto::Secret;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn setup() -> SettlementAuthority {
    SettlementAuthority::new(SystemConfig::default(), Secret::from_str("bench-secret")).unwrap()
}

fn bench_submit_online_transfer(c: &mut Criterion) {
    let mut authority = setup();
    let alice = authority.register_owner(OwnerCategory::Individual).unwrap();
    let bob = authority.register_owner(OwnerCategory::Individual).unwrap();
    authority.fund_non_digital_balance(&alice, 1_000_000).unwrap();
    let intermediary = authority.register_intermediary("I1", "R1", 0).unwrap();
    authority.fund_non_digital_reserve(&intermediary, 1_000_000).unwrap();
    let request = authority.request_emission(&intermediary, 1_000_000, "bench seed", 0).unwrap();
    authority.decide_emission(&request, true, 0).unwrap();
    authority.process_pending(0).unwrap();
    authority.exchange(&alice, &intermediary, 500_000).unwrap();
    authority.process_pending(1).unwrap();

    c.bench_function("submit_online_transfer", |b| {
        b.iter(|| authority.submit_online_transfer(black_box(&alice), black_box(&bob), black_box(1)))
    });
}

fn bench_process_pending_batch(c: &mut Criterion) {
    c.bench_function("process_pending_batch_of_50", |b| {
        b.iter_batched(
            || {
                let mut authority = setup();
                let alice = authority.register_owner(OwnerCategory::Individual).unwrap();
                let bob = authority.register_owner(OwnerCategory::Individual).unwrap();
                authority.fund_non_digital_balance(&alice, 1_000_000).unwrap();
                let intermediary = authority.register_intermediary("I1", "R1", 0).unwrap();
                authority.fund_non_digital_reserve(&intermediary, 1_000_000).unwrap();
                let request = authority.request_emission(&intermediary, 1_000_000, "seed", 0).unwrap();
                authority.decide_emission(&request, true, 0).unwrap();
                authority.process_pending(0).unwrap();
                authority.exchange(&alice, &intermediary, 500_000).unwrap();
                authority.process_pending(1).unwrap();
                for _ in 0..50 {
                    authority.submit_online_transfer(&alice, &bob, 1).unwrap();
                }
                authority
            },
            |mut authority| authority.process_pending(black_box(2)).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_submit_online_transfer, bench_process_pending_batch);
criterion_main!(benches);
