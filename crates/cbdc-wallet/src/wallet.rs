// Per-owner wallet: online/offline balances, pending offline transactions
// and settlement reconciliation (spec.md §3 Wallet, §4.5). Generalises
// `core/wallet.py`'s balance/pending-list/history fields into a typed
// struct; `is_active`/`expiry_time` become `active`/`expiry_time` per
// invariant (W3).
//
// Ownership (spec.md §5): each wallet exclusively owns its own balances,
// pending list and history. The authority mutates them only through
// `notify_credit`/`notify_debit`/`confirm_pending`, called from its
// post-commit hook — never by reaching into the wallet's fields directly.

use std::time::{SystemTime, UNIX_EPOCH};

use cbdc_core::Transaction;
use cbdc_crypto::Secret;

use crate::errors::WalletError;
use crate::history::{HistoryEntry, HistoryKind};

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Wallet {
    pub owner_id: String,
    pub online_balance: u64,
    pub offline_balance: u64,
    pub activation_time: Option<u64>,
    pub expiry_time: Option<u64>,
    pub active: bool,
    pub pending: Vec<Transaction>,
    pub history: Vec<HistoryEntry>,
}

impl Wallet {
    /// A freshly opened online-only wallet: zero balances, no offline
    /// capability until `activate_offline` is called.
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            online_balance: 0,
            offline_balance: 0,
            activation_time: None,
            expiry_time: None,
            active: false,
            pending: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Opens offline capability: bounded lifespan from `now` to
    /// `now + expiry_days` (default 14 per §6 `wallet_expiry_days`).
    pub fn activate_offline(&mut self, now: u64, expiry_days: u64) {
        self.activation_time = Some(now);
        self.expiry_time = Some(now + expiry_days * SECONDS_PER_DAY);
        self.active = true;
    }

    /// (W3): expired iff current time is past expiry, or the wallet was
    /// never activated / was explicitly deactivated.
    pub fn is_expired(&self, now: u64) -> bool {
        match self.expiry_time {
            Some(expiry) => now > expiry || !self.active,
            None => !self.active,
        }
    }

    /// Credits the online balance — deposits from exchange/issuance/transfer
    /// commits, or the recipient side of an online/offline transfer.
    /// `block_hash` is recorded when the credit stems from a committed
    /// transaction (confirmed), absent for a raw deposit (e.g. opening funds).
    pub fn notify_credit(&mut self, amount: u64, tx_id: Option<String>, block_hash: Option<String>, now: u64) {
        self.online_balance += amount;
        let kind = if block_hash.is_some() {
            HistoryKind::Confirmed
        } else {
            HistoryKind::Deposit
        };
        self.history
            .push(HistoryEntry::new(kind, amount, tx_id, block_hash, now, "completed"));
    }

    /// Debits the online balance on commit of a transaction this wallet
    /// sent. (W1): never allows the balance to go negative.
    pub fn notify_debit(
        &mut self,
        amount: u64,
        tx_id: Option<String>,
        block_hash: Option<String>,
        now: u64,
    ) -> Result<(), WalletError> {
        if self.online_balance < amount {
            return Err(WalletError::InsufficientFunds(format!(
                "online balance {} < debit {}",
                self.online_balance, amount
            )));
        }
        self.online_balance -= amount;
        self.history.push(HistoryEntry::new(
            HistoryKind::Withdrawal,
            amount,
            tx_id,
            block_hash,
            now,
            "completed",
        ));
        Ok(())
    }

    /// Step 1 of the offline-transfer lifecycle: moves `amount` from
    /// online to offline balance, a local operation with no ledger event.
    /// (W2): offline funds are drawn from online balance only.
    pub fn withdraw_to_offline(&mut self, amount: u64, max_balance: u64, now: u64) -> Result<(), WalletError> {
        if !self.active {
            return Err(WalletError::NotActivated);
        }
        if self.online_balance < amount {
            return Err(WalletError::InsufficientFunds(format!(
                "online balance {} < requested {}",
                self.online_balance, amount
            )));
        }
        let projected = self.offline_balance + amount;
        if projected > max_balance {
            return Err(WalletError::BalanceCapExceeded {
                attempted: projected,
                cap: max_balance,
            });
        }
        self.online_balance -= amount;
        self.offline_balance += amount;
        self.history.push(HistoryEntry::new(
            HistoryKind::Withdrawal,
            amount,
            None,
            None,
            now,
            "completed",
        ));
        Ok(())
    }

    /// Step 2: creates and signs an OFFLINE_TRANSFER, decrementing the
    /// sender's offline balance immediately; the recipient is NOT credited
    /// until the transaction commits. Rejected on an expired wallet (W3),
    /// but already-pending transactions remain valid.
    pub fn create_offline_transfer(
        &mut self,
        recipient: impl Into<String>,
        amount: u64,
        secret: &Secret,
        now: u64,
    ) -> Result<Transaction, WalletError> {
        if self.is_expired(now) {
            return Err(WalletError::Expired);
        }
        if self.offline_balance < amount {
            return Err(WalletError::InsufficientFunds(format!(
                "offline balance {} < requested {}",
                self.offline_balance, amount
            )));
        }
        let mut tx = Transaction::new_offline_transfer(self.owner_id.clone(), recipient, amount)?;
        tx.sign(secret);
        self.offline_balance -= amount;
        self.pending.push(tx.clone());
        self.history.push(HistoryEntry::new(
            HistoryKind::OfflineSubmitted,
            amount,
            Some(tx.id.clone()),
            None,
            now,
            "pending",
        ));
        Ok(tx)
    }

    /// (O3): pending transactions are submitted in the order they were
    /// created — the order they sit in `self.pending`.
    pub fn pending_snapshot(&self) -> Vec<Transaction> {
        self.pending.clone()
    }

    /// (W4): transitions a pending offline transaction to confirmed,
    /// associated with exactly one committed block hash. Called on the
    /// sender's wallet once its OFFLINE_TRANSFER commits.
    pub fn confirm_pending(&mut self, tx_id: &str, block_hash: &str, now: u64) -> Result<(), WalletError> {
        let idx = self
            .pending
            .iter()
            .position(|t| t.id == tx_id)
            .ok_or_else(|| WalletError::UnknownPendingTransaction(tx_id.to_string()))?;
        let tx = self.pending.remove(idx);
        self.history.push(HistoryEntry::new(
            HistoryKind::Confirmed,
            tx.amount,
            Some(tx.id),
            Some(block_hash.to_string()),
            now,
            "completed",
        ));
        Ok(())
    }

    pub fn balance_summary(&self) -> (u64, u64) {
        (self.online_balance, self.offline_balance)
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
