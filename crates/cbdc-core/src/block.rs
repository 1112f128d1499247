// Block: ordered batch of transactions extending the ledger by one
// height. Construction seals all fields into an immutable record; the
// hash is recomputed on demand rather than cached mutable state, since
// `Block` carries no interior mutability.

use cbdc_crypto::{content_hash, zero_hash};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transaction::Transaction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub parent_hash: String,
    pub transactions: Vec<Transaction>,
    pub timestamp: u64,
    pub proposer: String,
}

impl Block {
    /// Genesis block: height 0, empty transactions, all-zero parent hash.
    pub fn genesis() -> Self {
        Self {
            height: 0,
            parent_hash: zero_hash(),
            transactions: Vec::new(),
            timestamp: 0,
            proposer: "genesis".to_string(),
        }
    }

    pub fn new(
        height: u64,
        parent_hash: String,
        transactions: Vec<Transaction>,
        timestamp: u64,
        proposer: impl Into<String>,
    ) -> Self {
        Self {
            height,
            parent_hash,
            transactions,
            timestamp,
            proposer: proposer.into(),
        }
    }

    /// Canonical JSON: keys sorted ascending (`index`, `parent_hash`,
    /// `timestamp`, `transactions`), each transaction in its own
    /// canonical form. `serde_json::Map` without `preserve_order` iterates
    /// in sorted-key order, giving us the required encoding for free.
    pub fn canonical_json(&self) -> String {
        let mut map = Map::new();
        map.insert("index".to_string(), Value::from(self.height));
        map.insert(
            "parent_hash".to_string(),
            Value::String(self.parent_hash.clone()),
        );
        map.insert("timestamp".to_string(), Value::from(self.timestamp as f64));
        let txs: Vec<Value> = self
            .transactions
            .iter()
            .map(Transaction::canonical_value)
            .collect();
        map.insert("transactions".to_string(), Value::Array(txs));
        Value::Object(map).to_string()
    }

    /// Content hash over the canonical serialisation.
    pub fn hash(&self) -> String {
        content_hash(self.canonical_json().as_bytes())
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    pub fn contains_transaction(&self, id: &str) -> bool {
        self.transactions.iter().any(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    #[test]
    fn genesis_has_zero_parent_hash_and_no_transactions() {
        let g = Block::genesis();
        assert_eq!(g.height, 0);
        assert_eq!(g.parent_hash, zero_hash());
        assert!(g.transactions.is_empty());
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let tx = Transaction::new_online_transfer("alice", "bob", 10).unwrap();
        let block = Block::new(1, zero_hash(), vec![tx], 1000, "replica-0");
        assert_eq!(block.hash(), block.hash());
    }

    #[test]
    fn hash_changes_when_transactions_differ() {
        let tx_a = Transaction::new_online_transfer("alice", "bob", 10).unwrap();
        let tx_b = Transaction::new_online_transfer("alice", "bob", 20).unwrap();
        let block_a = Block::new(1, zero_hash(), vec![tx_a], 1000, "replica-0");
        let block_b = Block::new(1, zero_hash(), vec![tx_b], 1000, "replica-0");
        assert_ne!(block_a.hash(), block_b.hash());
    }
}
