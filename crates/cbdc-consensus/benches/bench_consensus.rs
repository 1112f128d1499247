use std::collections::HashSet;

use cbdc_consensus::ConsensusGroup;
use cbdc_core::{Block, Transaction};
use cbdc_crypto::Secret;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn replica_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("replica-{i}")).collect()
}

fn bench_run_round(c: &mut Criterion) {
    let ids = replica_ids(4);
    let tx = Transaction::new_online_transfer("a", "b", 10).unwrap();

    c.bench_function("run_round_n4", |b| {
        b.iter_batched(
            || {
                let group = ConsensusGroup::new(ids.clone(), Secret::from_str("bench-secret"), 5_000).unwrap();
                let block = Block::new(1, Block::genesis().hash(), vec![tx.clone()], 1_700_000_000, ids[0].clone());
                (group, block)
            },
            |(mut group, block)| group.run_round(black_box(block), 1_700_000_000, &HashSet::new()).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_run_round_larger_replica_set(c: &mut Criterion) {
    let ids = replica_ids(13); // f = 4
    let tx = Transaction::new_online_transfer("a", "b", 10).unwrap();

    c.bench_function("run_round_n13", |b| {
        b.iter_batched(
            || {
                let group = ConsensusGroup::new(ids.clone(), Secret::from_str("bench-secret"), 5_000).unwrap();
                let block = Block::new(1, Block::genesis().hash(), vec![tx.clone()], 1_700_000_000, ids[0].clone());
                (group, block)
            },
            |(mut group, block)| group.run_round(black_box(block), 1_700_000_000, &HashSet::new()).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_run_round, bench_run_round_larger_replica_set);
criterion_main!(benches);
