// Settlement authority (central bank): owns the sole ledger and
// consensus engine, the registries (intermediaries, owners, wallets,
// contracts), the pending transaction queue, emission requests, the
// audit log and the aggregate counters. Generalises
// `core/central_bank.py`'s `CentralBank` (a bare transaction_queue/banks
// dict) into the single-writer-per-state-kind task spec.md §5 requires;
// see `runtime.rs` for the task/channel wiring around this struct.

use std::collections::{BTreeMap, HashSet, VecDeque};

use cbdc_consensus::{ConsensusError, ConsensusGroup};
use cbdc_core::{Block, Ledger, SystemConfig, Transaction, TransactionKind, TransactionStatus};
use cbdc_crypto::Secret;
use cbdc_wallet::Wallet;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditLog, AuditSeverity};
use crate::contract::{Contract, ContractMethod};
use crate::emission::{EmissionRequest, EmissionState};
use crate::errors::AuthorityError;
use crate::intermediary::{Intermediary, IntermediaryStatus};
use crate::owner::{Owner, OwnerCategory};
use crate::snapshot::{Snapshot, SNAPSHOT_FORMAT_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub height: u64,
    pub tip_hash: String,
    pub pending_count: usize,
    pub valid: bool,
}

pub struct SettlementAuthority {
    config: SystemConfig,
    secret: Secret,
    ledger: Ledger,
    consensus: ConsensusGroup,
    intermediaries: BTreeMap<String, Intermediary>,
    owners: BTreeMap<String, Owner>,
    wallets: BTreeMap<String, Wallet>,
    contracts: BTreeMap<String, Contract>,
    pending_queue: VecDeque<Transaction>,
    emission_requests: BTreeMap<String, EmissionRequest>,
    audit_log: AuditLog,
    total_emitted: u64,
    /// Signed: an unbacked-issuance counter, per §4.7, can go negative —
    /// there is no real reserve backing a central bank's own emission.
    authority_reserve: i64,
    next_sequence: u64,
}

impl SettlementAuthority {
    pub fn new(config: SystemConfig, secret: Secret) -> Result<Self, AuthorityError> {
        config
            .validate()
            .map_err(AuthorityError::Validation)?;
        let replica_ids: Vec<String> = (0..config.replica_count).map(|i| format!("replica-{i}")).collect();
        let consensus = ConsensusGroup::new(replica_ids, secret.clone(), config.round_timeout_ms)
            .map_err(AuthorityError::from)?;
        Ok(Self {
            config,
            secret,
            ledger: Ledger::new(),
            consensus,
            intermediaries: BTreeMap::new(),
            owners: BTreeMap::new(),
            wallets: BTreeMap::new(),
            contracts: BTreeMap::new(),
            pending_queue: VecDeque::new(),
            emission_requests: BTreeMap::new(),
            audit_log: AuditLog::new(),
            total_emitted: 0,
            authority_reserve: 0,
            next_sequence: 0,
        })
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_sequence += 1;
        format!("{prefix}-{}", self.next_sequence)
    }

    // ── Registration ────────────────────────────────────────────────

    pub fn register_intermediary(
        &mut self,
        name: impl Into<String>,
        routing_code: impl Into<String>,
        now: u64,
    ) -> Result<String, AuthorityError> {
        let id = self.fresh_id("intermediary");
        let mut intermediary = Intermediary::new(id.clone(), name, routing_code, now);
        // No explicit "activate" call in the service surface beyond
        // `set_intermediary_status`; newly registered intermediaries
        // default to ACTIVE so emission/exchange flows work without an
        // extra onboarding step scenario §8 #1 never calls.
        intermediary.status = IntermediaryStatus::Active;
        self.intermediaries.insert(id.clone(), intermediary);
        log::info!("registered intermediary {id}");
        Ok(id)
    }

    pub fn set_intermediary_status(&mut self, id: &str, status: IntermediaryStatus) -> Result<(), AuthorityError> {
        let intermediary = self
            .intermediaries
            .get_mut(id)
            .ok_or_else(|| AuthorityError::NotFound(id.to_string()))?;
        intermediary.status = status;
        Ok(())
    }

    pub fn register_owner(&mut self, category: OwnerCategory) -> Result<String, AuthorityError> {
        let id = self.fresh_id("owner");
        self.owners.insert(id.clone(), Owner::new(id.clone(), category));
        log::info!("registered owner {id}");
        Ok(id)
    }

    /// Administrative test/ops hook: funds an intermediary's non-digital
    /// reserve directly, mirroring `core/financial_organization.py`'s
    /// constructor-assigned `cash_balance` — the service surface's
    /// `register_intermediary` takes no reserve amount, so seeding it is
    /// a separate, explicitly non-ledger operation.
    pub fn fund_non_digital_reserve(&mut self, intermediary_id: &str, amount: u64) -> Result<(), AuthorityError> {
        let intermediary = self
            .intermediaries
            .get_mut(intermediary_id)
            .ok_or_else(|| AuthorityError::NotFound(intermediary_id.to_string()))?;
        intermediary.non_digital_reserve += amount;
        Ok(())
    }

    /// Administrative test/ops hook, symmetric to `fund_non_digital_reserve`,
    /// for seeding an owner's non-digital (cash) balance ahead of an
    /// `exchange` call.
    pub fn fund_non_digital_balance(&mut self, owner_id: &str, amount: u64) -> Result<(), AuthorityError> {
        let owner = self
            .owners
            .get_mut(owner_id)
            .ok_or_else(|| AuthorityError::NotFound(owner_id.to_string()))?;
        owner.non_digital_balance += amount;
        Ok(())
    }

    // ── Wallets ──────────────────────────────────────────────────────

    pub fn open_wallet(&mut self, owner_id: &str, kind: WalletKind, now: u64) -> Result<(), AuthorityError> {
        let owner = self
            .owners
            .get_mut(owner_id)
            .ok_or_else(|| AuthorityError::NotFound(owner_id.to_string()))?;
        let carried_balance = owner.online_digital;
        owner.online_digital = 0;
        owner.has_wallet = true;

        let wallet = self
            .wallets
            .entry(owner_id.to_string())
            .or_insert_with(|| Wallet::new(owner_id));
        wallet.online_balance += carried_balance;
        if kind == WalletKind::Offline {
            wallet.activate_offline(now, self.config.wallet_expiry_days);
        }
        Ok(())
    }

    /// Local operation with no ledger event: moves `amount` from a wallet's
    /// online balance to its offline balance, bounded by
    /// `config.wallet_max_balance` (W2).
    pub fn withdraw_to_offline(&mut self, owner_id: &str, amount: u64, now: u64) -> Result<(), AuthorityError> {
        let cap = self.config.wallet_max_balance;
        let wallet = self
            .wallets
            .get_mut(owner_id)
            .ok_or_else(|| AuthorityError::NotFound(owner_id.to_string()))?;
        wallet.withdraw_to_offline(amount, cap, now).map_err(Into::into)
    }

    fn owner_online_balance(&self, owner_id: &str) -> Result<u64, AuthorityError> {
        if let Some(wallet) = self.wallets.get(owner_id) {
            Ok(wallet.online_balance)
        } else if let Some(owner) = self.owners.get(owner_id) {
            Ok(owner.online_digital)
        } else {
            Err(AuthorityError::NotFound(owner_id.to_string()))
        }
    }

    fn credit_owner_online(
        &mut self,
        owner_id: &str,
        amount: u64,
        tx_id: Option<String>,
        block_hash: Option<String>,
        now: u64,
    ) -> Result<(), AuthorityError> {
        if let Some(wallet) = self.wallets.get_mut(owner_id) {
            wallet.notify_credit(amount, tx_id, block_hash, now);
            Ok(())
        } else if let Some(owner) = self.owners.get_mut(owner_id) {
            owner.online_digital += amount;
            Ok(())
        } else {
            Err(AuthorityError::NotFound(owner_id.to_string()))
        }
    }

    fn debit_owner_online(
        &mut self,
        owner_id: &str,
        amount: u64,
        tx_id: Option<String>,
        block_hash: Option<String>,
        now: u64,
    ) -> Result<(), AuthorityError> {
        if let Some(wallet) = self.wallets.get_mut(owner_id) {
            wallet.notify_debit(amount, tx_id, block_hash, now).map_err(Into::into)
        } else if let Some(owner) = self.owners.get_mut(owner_id) {
            if owner.online_digital < amount {
                return Err(AuthorityError::InsufficientFunds(format!(
                    "owner {owner_id} online balance {} < {amount}",
                    owner.online_digital
                )));
            }
            owner.online_digital -= amount;
            Ok(())
        } else {
            Err(AuthorityError::NotFound(owner_id.to_string()))
        }
    }

    // ── Submission ───────────────────────────────────────────────────

    fn enqueue(&mut self, tx: Transaction) -> Result<String, AuthorityError> {
        if self.ledger.contains_transaction(&tx.id) || self.pending_queue.iter().any(|t| t.id == tx.id) {
            return Err(AuthorityError::DuplicateTransaction(tx.id));
        }
        let id = tx.id.clone();
        self.pending_queue.push_back(tx);
        Ok(id)
    }

    /// Rejects value-moving amounts below `min_transaction_amount_minor`
    /// (spec.md §6). Registration transactions carry amount 0 and never
    /// call this.
    fn check_min_amount(&self, amount: u64) -> Result<(), AuthorityError> {
        if amount < self.config.min_transaction_amount_minor {
            return Err(AuthorityError::Validation(format!(
                "amount {amount} below minimum transaction amount {}",
                self.config.min_transaction_amount_minor
            )));
        }
        Ok(())
    }

    pub fn submit_online_transfer(&mut self, sender: &str, recipient: &str, amount: u64) -> Result<String, AuthorityError> {
        self.check_min_amount(amount)?;
        if !self.owners.contains_key(sender) {
            return Err(AuthorityError::NotFound(sender.to_string()));
        }
        if !self.owners.contains_key(recipient) {
            return Err(AuthorityError::NotFound(recipient.to_string()));
        }
        let balance = self.owner_online_balance(sender)?;
        if balance < amount {
            return Err(AuthorityError::InsufficientFunds(format!(
                "sender {sender} online balance {balance} < {amount}"
            )));
        }
        let mut tx = Transaction::new_online_transfer(sender, recipient, amount)?;
        tx.sign(&self.secret);
        self.enqueue(tx)
    }

    /// Client-side: creates and signs the OFFLINE_TRANSFER against the
    /// sender's own wallet, decrementing its offline balance immediately.
    /// Not enqueued to the authority's pending queue yet — that happens
    /// on `reconnect_wallet` (spec.md §6).
    pub fn submit_offline_transfer(&mut self, sender: &str, recipient: &str, amount: u64, now: u64) -> Result<String, AuthorityError> {
        self.check_min_amount(amount)?;
        let wallet = self
            .wallets
            .get_mut(sender)
            .ok_or_else(|| AuthorityError::NotFound(sender.to_string()))?;
        let tx = wallet.create_offline_transfer(recipient, amount, &self.secret, now)?;
        Ok(tx.id)
    }

    /// Flushes `sender`'s pending offline transactions to the authority
    /// queue. Idempotent: a transaction already queued or committed is
    /// silently skipped rather than re-enqueued, so calling this twice
    /// with no new pending transactions commits the same set (§8).
    pub fn reconnect_wallet(&mut self, owner_id: &str) -> Result<Vec<String>, AuthorityError> {
        let pending = self
            .wallets
            .get(owner_id)
            .ok_or_else(|| AuthorityError::NotFound(owner_id.to_string()))?
            .pending_snapshot();

        let mut submitted = Vec::new();
        for tx in pending {
            match self.enqueue(tx) {
                Ok(id) => submitted.push(id),
                Err(AuthorityError::DuplicateTransaction(_)) => {
                    log::debug!("reconnect_wallet({owner_id}): transaction already queued, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(submitted)
    }

    pub fn exchange(&mut self, owner_id: &str, intermediary_id: &str, amount: u64) -> Result<String, AuthorityError> {
        self.check_min_amount(amount)?;
        let owner = self
            .owners
            .get(owner_id)
            .ok_or_else(|| AuthorityError::NotFound(owner_id.to_string()))?;
        if owner.non_digital_balance < amount {
            return Err(AuthorityError::InsufficientFunds(format!(
                "owner {owner_id} non-digital balance {} < {amount}",
                owner.non_digital_balance
            )));
        }
        let intermediary = self
            .intermediaries
            .get(intermediary_id)
            .ok_or_else(|| AuthorityError::NotFound(intermediary_id.to_string()))?;
        if !intermediary.is_active() {
            return Err(AuthorityError::Validation(format!("intermediary {intermediary_id} not active")));
        }
        if intermediary.digital_reserve < amount {
            return Err(AuthorityError::InsufficientFunds(format!(
                "intermediary {intermediary_id} digital reserve {} < {amount}",
                intermediary.digital_reserve
            )));
        }

        let mut tx = Transaction::new_exchange(owner_id, intermediary_id, amount)?;
        tx.sign(&self.secret);
        self.enqueue(tx)
    }

    pub fn request_emission(
        &mut self,
        intermediary_id: &str,
        amount: u64,
        purpose: impl Into<String>,
        now: u64,
    ) -> Result<String, AuthorityError> {
        self.check_min_amount(amount)?;
        let intermediary = self
            .intermediaries
            .get(intermediary_id)
            .ok_or_else(|| AuthorityError::NotFound(intermediary_id.to_string()))?;
        if !intermediary.is_active() {
            return Err(AuthorityError::Validation(format!("intermediary {intermediary_id} not active")));
        }
        if intermediary.non_digital_reserve < amount {
            return Err(AuthorityError::InsufficientFunds(format!(
                "intermediary {intermediary_id} non-digital reserve {} < {amount}",
                intermediary.non_digital_reserve
            )));
        }
        let id = self.fresh_id("emission");
        self.emission_requests
            .insert(id.clone(), EmissionRequest::new(id.clone(), intermediary_id, amount, purpose, now));
        Ok(id)
    }

    pub fn decide_emission(&mut self, request_id: &str, approve: bool, now: u64) -> Result<Option<String>, AuthorityError> {
        let request = self
            .emission_requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| AuthorityError::NotFound(request_id.to_string()))?;
        if request.state != EmissionState::Pending {
            return Err(AuthorityError::Validation(format!("emission request {request_id} already decided")));
        }

        if !approve {
            let r = self.emission_requests.get_mut(request_id).unwrap();
            r.state = EmissionState::Rejected;
            r.decided_at = Some(now);
            return Ok(None);
        }

        let mut tx = Transaction::new_issuance(&request.intermediary_id, request.amount)?;
        tx.sign(&self.secret);
        let tx_id = self.enqueue(tx)?;

        let r = self.emission_requests.get_mut(request_id).unwrap();
        r.state = EmissionState::Approved;
        r.decided_at = Some(now);
        r.issuance_tx_id = Some(tx_id.clone());
        Ok(Some(tx_id))
    }

    // ── Contracts ────────────────────────────────────────────────────

    pub fn contract_create(
        &mut self,
        id: impl Into<String>,
        creator: impl Into<String>,
        initial_storage: BTreeMap<String, u64>,
    ) -> Result<(), AuthorityError> {
        let id = id.into();
        self.contracts.insert(id.clone(), Contract::new(id, creator, initial_storage));
        Ok(())
    }

    pub fn contract_call(&mut self, id: &str, method: &str, args: &[String], caller: &str) -> Result<String, AuthorityError> {
        if !self.contracts.contains_key(id) {
            return Err(AuthorityError::NotFound(id.to_string()));
        }
        let mut tx = Transaction::new_contract_call(caller, id, method, args)?;
        tx.sign(&self.secret);
        self.enqueue(tx)
    }

    pub fn contract_storage(&self, id: &str) -> Option<&BTreeMap<String, u64>> {
        self.contracts.get(id).map(|c| &c.storage)
    }

    // ── Consensus driving ────────────────────────────────────────────

    /// The sole caller of consensus: repeatedly selects a FIFO batch of
    /// queued transactions (up to `block_size_limit`), drives one round
    /// to completion, and — on commit — runs post-commit hooks in block
    /// order (O1/O2). Stops when the queue drains or a round times out;
    /// on timeout the batch's transactions remain queued untouched (§7).
    pub fn process_pending(&mut self, now: u64) -> Result<Vec<String>, AuthorityError> {
        let mut committed_hashes = Vec::new();

        loop {
            if self.pending_queue.is_empty() {
                break;
            }
            let batch_size = self.config.block_size_limit.min(self.pending_queue.len());
            let mut batch: Vec<Transaction> = self.pending_queue.iter().take(batch_size).cloned().collect();
            for tx in &mut batch {
                tx.status = TransactionStatus::Queued;
            }

            let tip = self.ledger.tip();
            let height = tip.height + 1;
            let parent_hash = tip.hash();
            let proposer = self.consensus.current_leader().to_string();
            let block = Block::new(height, parent_hash, batch, now, proposer);

            match self.consensus.run_round(block, now, &HashSet::new()) {
                Ok((hash, mut committed_block)) => {
                    for tx in &mut committed_block.transactions {
                        self.apply_post_commit(tx, &hash, now);
                    }
                    let committed_ids: HashSet<String> =
                        committed_block.transactions.iter().map(|t| t.id.clone()).collect();
                    let appended_hash = self.ledger.append_committed(committed_block).map_err(AuthorityError::from)?;
                    debug_assert_eq!(hash, appended_hash, "status mutation must not affect the block hash");
                    self.pending_queue.retain(|t| !committed_ids.contains(&t.id));
                    committed_hashes.push(appended_hash);
                }
                Err(ConsensusError::Timeout) => {
                    self.audit_log.record(
                        AuditSeverity::Warn,
                        "consensus round timed out; view advanced, retry on next process_pending call",
                        now,
                    );
                    break;
                }
                Err(e) => {
                    self.audit_log.record(AuditSeverity::Fatal, format!("consensus safety violation: {e}"), now);
                    return Err(e.into());
                }
            }
        }
        Ok(committed_hashes)
    }

    /// Re-validates `tx` against current authoritative state and either
    /// applies its effect (status -> Committed) or rolls it back within
    /// the block (status -> Rejected), per §4.4's post-commit failure
    /// policy. The transaction stays in the sealed block either way.
    fn apply_post_commit(&mut self, tx: &mut Transaction, block_hash: &str, now: u64) {
        let result = match tx.kind {
            TransactionKind::Registration => Ok(()),
            TransactionKind::Issuance => self.apply_issuance(tx),
            TransactionKind::Exchange => self.apply_exchange(tx, block_hash, now),
            TransactionKind::OnlineTransfer => self.apply_online_transfer(tx, block_hash, now),
            TransactionKind::OfflineTransfer => self.apply_offline_transfer(tx, block_hash, now),
            TransactionKind::ContractCall => self.apply_contract_call(tx, now),
        };
        match result {
            Ok(()) => tx.status = TransactionStatus::Committed,
            Err(reason) => {
                tx.status = TransactionStatus::Rejected;
                self.audit_log.record(
                    AuditSeverity::Warn,
                    format!("transaction {} rejected at post-commit: {reason}", tx.id),
                    now,
                );
            }
        }
    }

    fn apply_issuance(&mut self, tx: &Transaction) -> Result<(), String> {
        let intermediary = self
            .intermediaries
            .get_mut(&tx.recipient)
            .ok_or_else(|| "unknown intermediary".to_string())?;
        if !intermediary.is_active() {
            return Err("intermediary not active".to_string());
        }
        if intermediary.non_digital_reserve < tx.amount {
            return Err("insufficient non-digital reserve".to_string());
        }
        intermediary.digital_reserve += tx.amount;
        intermediary.non_digital_reserve -= tx.amount;
        self.authority_reserve -= tx.amount as i64;
        self.total_emitted += tx.amount;
        Ok(())
    }

    fn apply_exchange(&mut self, tx: &Transaction, block_hash: &str, now: u64) -> Result<(), String> {
        let owner_id = tx.sender.clone();
        let intermediary_id = tx
            .metadata
            .get("intermediary_id")
            .cloned()
            .ok_or_else(|| "missing intermediary_id".to_string())?;

        {
            let owner = self.owners.get(&owner_id).ok_or_else(|| "unknown owner".to_string())?;
            if owner.non_digital_balance < tx.amount {
                return Err("insufficient non-digital balance".to_string());
            }
        }
        {
            let intermediary = self
                .intermediaries
                .get(&intermediary_id)
                .ok_or_else(|| "unknown intermediary".to_string())?;
            if !intermediary.is_active() {
                return Err("intermediary not active".to_string());
            }
            if intermediary.digital_reserve < tx.amount {
                return Err("insufficient digital reserve".to_string());
            }
        }

        self.owners.get_mut(&owner_id).unwrap().non_digital_balance -= tx.amount;
        {
            let intermediary = self.intermediaries.get_mut(&intermediary_id).unwrap();
            intermediary.digital_reserve -= tx.amount;
            intermediary.non_digital_reserve += tx.amount;
        }
        self.credit_owner_online(&owner_id, tx.amount, Some(tx.id.clone()), Some(block_hash.to_string()), now)
            .map_err(|e| e.to_string())
    }

    fn apply_online_transfer(&mut self, tx: &Transaction, block_hash: &str, now: u64) -> Result<(), String> {
        self.debit_owner_online(&tx.sender, tx.amount, Some(tx.id.clone()), Some(block_hash.to_string()), now)
            .map_err(|e| e.to_string())?;
        self.credit_owner_online(&tx.recipient, tx.amount, Some(tx.id.clone()), Some(block_hash.to_string()), now)
            .map_err(|e| e.to_string())
    }

    fn apply_offline_transfer(&mut self, tx: &Transaction, block_hash: &str, now: u64) -> Result<(), String> {
        self.credit_owner_online(&tx.recipient, tx.amount, Some(tx.id.clone()), Some(block_hash.to_string()), now)
            .map_err(|e| e.to_string())?;
        let sender_wallet = self
            .wallets
            .get_mut(&tx.sender)
            .ok_or_else(|| "sender wallet missing for offline settlement".to_string())?;
        sender_wallet
            .confirm_pending(&tx.id, block_hash, now)
            .map_err(|e| e.to_string())
    }

    fn apply_contract_call(&mut self, tx: &Transaction, now: u64) -> Result<(), String> {
        let contract_id = tx.metadata.get("contract_id").cloned().unwrap_or_default();
        let method_str = tx.metadata.get("method").cloned().unwrap_or_default();
        let args_str = tx.metadata.get("args").cloned().unwrap_or_default();
        let method = ContractMethod::parse(&method_str).map_err(|e| e.to_string())?;
        let args: Vec<String> = if args_str.is_empty() {
            Vec::new()
        } else {
            args_str.split(',').map(|s| s.to_string()).collect()
        };
        let contract = self
            .contracts
            .get_mut(&contract_id)
            .ok_or_else(|| "unknown contract".to_string())?;
        let ok = contract.dispatch(&method, &args, now).map_err(|e| e.to_string())?;
        if !ok {
            return Err("contract method returned false".to_string());
        }
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn ledger_info(&self) -> LedgerInfo {
        let tip = self.ledger.tip();
        LedgerInfo {
            height: tip.height,
            tip_hash: tip.hash(),
            pending_count: self.pending_queue.len(),
            valid: self.ledger.validate_chain().is_ok(),
        }
    }

    pub fn transaction_history(&self, filter: impl FnMut(&Transaction) -> bool) -> Vec<Transaction> {
        self.ledger.iter_transactions(filter).cloned().collect()
    }

    pub fn owner(&self, id: &str) -> Option<&Owner> {
        self.owners.get(id)
    }

    pub fn intermediary(&self, id: &str) -> Option<&Intermediary> {
        self.intermediaries.get(id)
    }

    pub fn wallet(&self, owner_id: &str) -> Option<&Wallet> {
        self.wallets.get(owner_id)
    }

    pub fn emission_request(&self, id: &str) -> Option<&EmissionRequest> {
        self.emission_requests.get(id)
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    pub fn authority_reserve(&self) -> i64 {
        self.authority_reserve
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn block_count(&self) -> usize {
        self.ledger.block_count()
    }

    pub fn snapshot(&self, now: u64) -> Snapshot {
        let mut block_hashes = BTreeMap::new();
        for height in 0..=self.ledger.height() {
            if let Some(block) = self.ledger.get_by_height(height) {
                block_hashes.insert(height, block.hash());
            }
        }
        let owner_balances = self
            .owners
            .iter()
            .map(|(id, o)| {
                let online = self.wallets.get(id).map(|w| w.online_balance).unwrap_or(o.online_digital);
                (id.clone(), (o.non_digital_balance, online))
            })
            .collect();
        let intermediary_reserves = self
            .intermediaries
            .iter()
            .map(|(id, i)| (id.clone(), (i.non_digital_reserve, i.digital_reserve)))
            .collect();
        let contract_storage = self
            .contracts
            .iter()
            .map(|(id, c)| (id.clone(), c.storage.clone()))
            .collect();

        Snapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            taken_at: now,
            ledger_height: self.ledger.height(),
            ledger_tip_hash: self.ledger.tip().hash(),
            block_hashes,
            owner_balances,
            intermediary_reserves,
            contract_storage,
            total_emitted: self.total_emitted,
            authority_reserve: self.authority_reserve.max(0) as u64,
        }
    }
}
