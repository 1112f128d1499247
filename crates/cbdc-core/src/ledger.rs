// Append-only, hash-linked ledger. Generalises the teacher's layered
// process_block validation (check, then check, then mutate) to a
// height-indexed batch ledger instead of a per-account chain.

use std::collections::{BTreeMap, HashSet};

use crate::block::Block;
use crate::errors::CoreError;
use crate::transaction::Transaction;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    blocks: BTreeMap<u64, Block>,
    /// Index of every committed transaction id, across all blocks —
    /// enforces (L3) in O(1) rather than scanning every block on append.
    committed_tx_ids: HashSet<String>,
}

impl Ledger {
    /// A fresh ledger seeded with the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            blocks: BTreeMap::new(),
            committed_tx_ids: HashSet::new(),
        };
        let genesis = Block::genesis();
        ledger.blocks.insert(genesis.height, genesis);
        ledger
    }

    pub fn tip(&self) -> &Block {
        self.blocks
            .values()
            .next_back()
            .expect("ledger always contains at least the genesis block")
    }

    pub fn height(&self) -> u64 {
        self.tip().height
    }

    pub fn get_by_height(&self, height: u64) -> Option<&Block> {
        self.blocks.get(&height)
    }

    pub fn contains_transaction(&self, id: &str) -> bool {
        self.committed_tx_ids.contains(id)
    }

    /// Append a block produced by a completed consensus round. Fails with
    /// `LedgerConflict` if height/parent don't extend the tip, or
    /// `DuplicateTransaction` if any transaction id is already committed.
    pub fn append_committed(&mut self, block: Block) -> Result<String, CoreError> {
        let tip = self.tip();
        if block.height != tip.height + 1 {
            return Err(CoreError::LedgerConflict(format!(
                "expected height {}, got {}",
                tip.height + 1,
                block.height
            )));
        }
        if block.parent_hash != tip.hash() {
            return Err(CoreError::LedgerConflict(format!(
                "expected parent hash {}, got {}",
                tip.hash(),
                block.parent_hash
            )));
        }
        if block.transactions.is_empty() {
            return Err(CoreError::LedgerConflict(
                "cannot commit a block with zero transactions".to_string(),
            ));
        }
        for tx in &block.transactions {
            if self.committed_tx_ids.contains(&tx.id) {
                return Err(CoreError::DuplicateTransaction(tx.id.clone()));
            }
        }

        let hash = block.hash();
        for tx in &block.transactions {
            self.committed_tx_ids.insert(tx.id.clone());
        }
        self.blocks.insert(block.height, block);
        Ok(hash)
    }

    /// Walks (L1)-(L3) in order and returns the first violation found, if any.
    pub fn validate_chain(&self) -> Result<(), CoreError> {
        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut expected_height = 0u64;
        let mut expected_parent: Option<String> = None;

        for (height, block) in &self.blocks {
            if *height != expected_height {
                return Err(CoreError::LedgerConflict(format!(
                    "non-contiguous height: expected {}, found {}",
                    expected_height, height
                )));
            }
            if let Some(parent) = &expected_parent {
                if &block.parent_hash != parent {
                    return Err(CoreError::LedgerConflict(format!(
                        "block at height {} has parent_hash {} but predecessor hash is {}",
                        height, block.parent_hash, parent
                    )));
                }
            }
            for tx in &block.transactions {
                if !seen_ids.insert(&tx.id) {
                    return Err(CoreError::DuplicateTransaction(tx.id.clone()));
                }
            }
            expected_parent = Some(block.hash());
            expected_height += 1;
        }
        Ok(())
    }

    /// Recomputes every block's hash against its own stored value and
    /// against the next block's recorded parent; used by tests and by
    /// (L4)'s "recompute(canonical(B)) = B.hash" property.
    pub fn recompute_is_valid(&self) -> bool {
        let heights: Vec<u64> = self.blocks.keys().copied().collect();
        for window in heights.windows(2) {
            let (prev_h, next_h) = (window[0], window[1]);
            let prev = &self.blocks[&prev_h];
            let next = &self.blocks[&next_h];
            if next.parent_hash != prev.hash() {
                return false;
            }
        }
        self.validate_chain().is_ok()
    }

    pub fn iter_transactions<'a>(
        &'a self,
        mut filter: impl FnMut(&Transaction) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.blocks
            .values()
            .flat_map(|b| b.transactions.iter())
            .filter(move |tx| filter(tx))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
