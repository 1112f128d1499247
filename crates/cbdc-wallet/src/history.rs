// Transaction history: the append-only log of typed records spec.md §3
// names on `Wallet` (deposit, withdrawal, offline_submitted, confirmed),
// supplemented per SPEC_FULL §4.5a with the concrete record shape
// `core/wallet.py`'s `transaction_history` keeps (kind, amount, status).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Deposit,
    Withdrawal,
    OfflineSubmitted,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub amount: u64,
    pub transaction_id: Option<String>,
    pub block_hash: Option<String>,
    pub timestamp: u64,
    pub status: &'static str,
}

impl HistoryEntry {
    pub fn new(
        kind: HistoryKind,
        amount: u64,
        transaction_id: Option<String>,
        block_hash: Option<String>,
        timestamp: u64,
        status: &'static str,
    ) -> Self {
        Self {
            kind,
            amount,
            transaction_id,
            block_hash,
            timestamp,
            status,
        }
    }
}
