// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS — cbdc-core
//
// These tests verify mathematical invariants that MUST hold for ALL possible
// inputs. proptest generates thousands of random inputs per property.
//
// ZERO production code changes — this is a #[cfg(test)] integration test.
// Run: cargo test --release -p cbdc-core --test prop_core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use cbdc_core::{Block, Ledger, Transaction};
use proptest::prelude::*;

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        "[a-z]{1,12}",     // sender
        "[a-z]{1,12}",     // recipient
        1u64..1_000_000u64, // amount
    )
        .prop_map(|(sender, recipient, amount)| {
            Transaction::new_online_transfer(sender, recipient, amount).unwrap()
        })
}

fn arb_block() -> impl Strategy<Value = Block> {
    (
        1u64..=1_000_000,
        "[0-9a-f]{64}",
        proptest::collection::vec(arb_transaction(), 1..5),
        1_700_000_000u64..=2_000_000_000u64,
        "replica-[0-3]",
    )
        .prop_map(|(height, parent_hash, transactions, timestamp, proposer)| {
            Block::new(height, parent_hash, transactions, timestamp, proposer)
        })
}

proptest! {
    /// PROPERTY: block hash is deterministic — same block always yields same hash
    #[test]
    fn prop_block_hash_deterministic(block in arb_block()) {
        let h1 = block.hash();
        let h2 = block.hash();
        prop_assert_eq!(h1, h2, "block hash must be deterministic");
    }

    /// PROPERTY: block hash output is always 64 hex chars (SHA-256 = 32 bytes = 64 hex)
    #[test]
    fn prop_block_hash_length(block in arb_block()) {
        let hash = block.hash();
        prop_assert_eq!(hash.len(), 64, "SHA-256 hash must be 64 hex chars");
        prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()),
            "Hash must be valid hex");
    }

    /// PROPERTY: changing any transaction in a block changes the block hash
    #[test]
    fn prop_different_transactions_different_hash(
        amount1 in 1u64..=1_000_000u64,
        amount2 in 1_000_001u64..=2_000_000u64,
    ) {
        let tx1 = Transaction::new_online_transfer("alice", "bob", amount1).unwrap();
        let tx2 = Transaction::new_online_transfer("alice", "bob", amount2).unwrap();
        let block1 = Block::new(1, "0".repeat(64), vec![tx1], 1_700_000_000, "replica-0");
        let block2 = Block::new(1, "0".repeat(64), vec![tx2], 1_700_000_000, "replica-0");
        prop_assert_ne!(block1.hash(), block2.hash());
    }

    /// PROPERTY: transaction content hash is deterministic
    #[test]
    fn prop_transaction_content_hash_deterministic(tx in arb_transaction()) {
        prop_assert_eq!(tx.content_hash(), tx.content_hash());
    }
}

// ─────────────────────────────────────────────────────────────────
// LEDGER INVARIANTS
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: appending a valid chain of blocks keeps validate_chain Ok
    #[test]
    fn prop_append_chain_stays_valid(
        amounts in proptest::collection::vec(1u64..1_000, 1..8),
    ) {
        let mut ledger = Ledger::new();
        for amount in amounts {
            let tx = Transaction::new_online_transfer("alice", "bob", amount).unwrap();
            let tip = ledger.tip();
            let block = Block::new(tip.height + 1, tip.hash(), vec![tx], 1_700_000_000, "replica-0");
            ledger.append_committed(block).unwrap();
        }
        prop_assert!(ledger.validate_chain().is_ok());
        prop_assert!(ledger.recompute_is_valid());
    }

    /// PROPERTY: every committed transaction id is found by contains_transaction
    #[test]
    fn prop_committed_ids_are_found(
        amounts in proptest::collection::vec(1u64..1_000, 1..8),
    ) {
        let mut ledger = Ledger::new();
        let mut ids = Vec::new();
        for amount in amounts {
            let tx = Transaction::new_online_transfer("alice", "bob", amount).unwrap();
            ids.push(tx.id.clone());
            let tip = ledger.tip();
            let block = Block::new(tip.height + 1, tip.hash(), vec![tx], 1_700_000_000, "replica-0");
            ledger.append_committed(block).unwrap();
        }
        for id in ids {
            prop_assert!(ledger.contains_transaction(&id));
        }
    }

    /// PROPERTY: a fresh ledger is always height 0 with a valid empty chain
    #[test]
    fn prop_empty_ledger_is_valid(_dummy in 0u8..=255) {
        let ledger = Ledger::new();
        prop_assert_eq!(ledger.height(), 0);
        prop_assert!(ledger.validate_chain().is_ok());
    }
}
