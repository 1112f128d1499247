// Periodic, versioned projection of ledger heights/hashes, balances,
// contract storage and emission totals (spec.md §6 Persisted snapshot).
// Grounded in `los-consensus/src/checkpoint.rs`'s `FinalityCheckpoint`
// (a state root over sorted accounts) — the core only *produces* this
// struct; writing it to a file is the excluded "persistence file layout".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub format_version: u32,
    pub taken_at: u64,
    pub ledger_height: u64,
    pub ledger_tip_hash: String,
    /// height -> block hash, for every committed block.
    pub block_hashes: BTreeMap<u64, String>,
    /// owner id -> (non_digital, online_digital).
    pub owner_balances: BTreeMap<String, (u64, u64)>,
    /// intermediary id -> (non_digital_reserve, digital_reserve).
    pub intermediary_reserves: BTreeMap<String, (u64, u64)>,
    /// contract id -> storage map.
    pub contract_storage: BTreeMap<String, BTreeMap<String, u64>>,
    pub total_emitted: u64,
    pub authority_reserve: u64,
}
