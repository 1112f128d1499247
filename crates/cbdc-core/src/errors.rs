// Typed error kinds for the ledger/transaction/hashing layer. No
// anyhow/thiserror in the dependency graph, so these are hand-rolled
// the way the workspace's one prior error enum was.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Precondition failed on transaction construction or submission
    /// (unknown account, non-positive amount outside REGISTRATION, ...).
    Validation(String),
    /// Balance check failed at submission or post-commit.
    InsufficientFunds(String),
    /// Transaction id already present in a committed block.
    DuplicateTransaction(String),
    /// Parent hash / height mismatch on append — should not occur in
    /// normal operation; indicates a bug or corrupted ledger state.
    LedgerConflict(String),
    /// Contract dispatch named an unknown method.
    ContractMethodUnknown(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoreError::Validation(msg) => write!(f, "VALIDATION: {msg}"),
            CoreError::InsufficientFunds(msg) => write!(f, "INSUFFICIENT_FUNDS: {msg}"),
            CoreError::DuplicateTransaction(msg) => write!(f, "DUPLICATE_TRANSACTION: {msg}"),
            CoreError::LedgerConflict(msg) => write!(f, "LEDGER_CONFLICT: {msg}"),
            CoreError::ContractMethodUnknown(msg) => write!(f, "CONTRACT_METHOD_UNKNOWN: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}
