// Contract registry: keyed storage and a closed built-in method set.
// Grounded in `examples/original_source/core/blockchain/smart_contract.py`'s
// `execute()` dispatch (`get_balance`/`transfer`/`emit_event`), renamed to
// spec.md §4.6's `balance_of`/`transfer`/`emit`, and in the teacher's
// closed enum-dispatch style (`los-core::Ledger::process_block`'s
// `BlockType` match).
//
// All mutation happens inside the authority's post-commit hook, so
// dispatch here takes no lock and has no side channel beyond its own
// `storage`/`events` fields — determinism across replicas falls out of
// every replica running the same commit-ordered sequence of calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AuthorityError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractMethod {
    BalanceOf,
    Transfer,
    Emit,
}

impl ContractMethod {
    pub fn parse(method: &str) -> Result<Self, AuthorityError> {
        match method {
            "balance_of" => Ok(ContractMethod::BalanceOf),
            "transfer" => Ok(ContractMethod::Transfer),
            "emit" => Ok(ContractMethod::Emit),
            other => Err(AuthorityError::ContractMethodUnknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEvent {
    pub event_type: String,
    pub payload: String,
    pub contract_id: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub creator: String,
    /// Opaque keyed storage. Balances live under keys of the form
    /// `"balance:<account>"`, the convention `transfer`/`balance_of` use.
    pub storage: BTreeMap<String, u64>,
    pub events: Vec<ContractEvent>,
}

impl Contract {
    pub fn new(id: impl Into<String>, creator: impl Into<String>, initial_storage: BTreeMap<String, u64>) -> Self {
        Self {
            id: id.into(),
            creator: creator.into(),
            storage: initial_storage,
            events: Vec::new(),
        }
    }

    fn balance_key(account: &str) -> String {
        format!("balance:{account}")
    }

    pub fn balance_of(&self, account: &str) -> u64 {
        *self.storage.get(&Self::balance_key(account)).unwrap_or(&0)
    }

    /// Debits `from` and credits `to` within contract storage. Returns
    /// `false` (aborting without mutation) on insufficient `from` balance,
    /// matching the original's `_transfer` semantics.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64, now: u64) -> bool {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }
        let to_balance = self.balance_of(to);
        self.storage.insert(Self::balance_key(from), from_balance - amount);
        self.storage.insert(Self::balance_key(to), to_balance + amount);
        self.events.push(ContractEvent {
            event_type: "transfer".to_string(),
            payload: format!("{{\"from\":\"{from}\",\"to\":\"{to}\",\"amount\":{amount}}}"),
            contract_id: self.id.clone(),
            timestamp: now,
        });
        true
    }

    pub fn emit(&mut self, event_type: impl Into<String>, payload: impl Into<String>, now: u64) {
        self.events.push(ContractEvent {
            event_type: event_type.into(),
            payload: payload.into(),
            contract_id: self.id.clone(),
            timestamp: now,
        });
    }

    /// Dispatches a parsed method against `args` (positional: for
    /// `transfer`, `[from, to, amount]`; for `balance_of`, `[account]`;
    /// for `emit`, `[event_type, payload]`). Returns `Ok(true/false)` for
    /// `transfer`'s success flag, `Ok(true)` otherwise.
    pub fn dispatch(&mut self, method: &ContractMethod, args: &[String], now: u64) -> Result<bool, AuthorityError> {
        match method {
            ContractMethod::BalanceOf => Ok(true),
            ContractMethod::Transfer => {
                let amount: u64 = args
                    .get(2)
                    .and_then(|a| a.parse().ok())
                    .ok_or_else(|| AuthorityError::Validation("transfer requires [from, to, amount]".to_string()))?;
                let from = args.first().ok_or_else(|| AuthorityError::Validation("missing from".to_string()))?;
                let to = args.get(1).ok_or_else(|| AuthorityError::Validation("missing to".to_string()))?;
                Ok(self.transfer(from, to, amount, now))
            }
            ContractMethod::Emit => {
                let event_type = args.first().cloned().unwrap_or_default();
                let payload = args.get(1).cloned().unwrap_or_default();
                self.emit(event_type, payload, now);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_is_rejected() {
        let err = ContractMethod::parse("self_destruct").unwrap_err();
        assert!(matches!(err, AuthorityError::ContractMethodUnknown(_)));
    }

    #[test]
    fn transfer_insufficient_balance_leaves_storage_unchanged_scenario_6() {
        let mut storage = BTreeMap::new();
        storage.insert("balance:A".to_string(), 10);
        storage.insert("balance:B".to_string(), 0);
        let mut contract = Contract::new("c1", "A", storage);

        let ok = contract.transfer("A", "B", 25, 1000);
        assert!(!ok);
        assert_eq!(contract.balance_of("A"), 10);
        assert_eq!(contract.balance_of("B"), 0);
        assert!(contract.events.is_empty());
    }

    #[test]
    fn transfer_success_updates_both_balances_and_logs_event() {
        let mut storage = BTreeMap::new();
        storage.insert("balance:A".to_string(), 100);
        let mut contract = Contract::new("c1", "A", storage);

        let ok = contract.transfer("A", "B", 40, 1000);
        assert!(ok);
        assert_eq!(contract.balance_of("A"), 60);
        assert_eq!(contract.balance_of("B"), 40);
        assert_eq!(contract.events.len(), 1);
    }

    #[test]
    fn emit_appends_event_with_contract_id() {
        let mut contract = Contract::new("c1", "A", BTreeMap::new());
        contract.emit("price_update", "{\"price\":100}", 1000);
        assert_eq!(contract.events.len(), 1);
        assert_eq!(contract.events[0].contract_id, "c1");
    }

    #[test]
    fn balance_of_unknown_account_is_zero() {
        let contract = Contract::new("c1", "A", BTreeMap::new());
        assert_eq!(contract.balance_of("nobody"), 0);
    }
}
