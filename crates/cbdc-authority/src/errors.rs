// Top-level error type for the settlement authority: wraps the
// lower-layer error enums plus the submission-time kinds spec.md §7
// names that have no natural home in cbdc-core/cbdc-consensus/cbdc-wallet.

use std::fmt;

use cbdc_consensus::ConsensusError;
use cbdc_core::CoreError;
use cbdc_wallet::WalletError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// Precondition failed on submission: unknown account, inactive
    /// intermediary, non-positive amount, expired wallet.
    Validation(String),
    /// Balance check failed at submission or post-commit.
    InsufficientFunds(String),
    /// Transaction id already present in the queue or committed ledger.
    DuplicateTransaction(String),
    /// Round aborted; caller may retry by calling `process_pending` again.
    ConsensusTimeout,
    /// Contract dispatch named an unknown method.
    ContractMethodUnknown(String),
    /// Parent/height mismatch — should not occur in normal operation.
    LedgerConflict(String),
    /// Unknown owner, intermediary, or contract id referenced by a request.
    NotFound(String),
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthorityError::Validation(msg) => write!(f, "VALIDATION: {msg}"),
            AuthorityError::InsufficientFunds(msg) => write!(f, "INSUFFICIENT_FUNDS: {msg}"),
            AuthorityError::DuplicateTransaction(msg) => write!(f, "DUPLICATE_TRANSACTION: {msg}"),
            AuthorityError::ConsensusTimeout => write!(f, "CONSENSUS_TIMEOUT: round aborted, retry process_pending"),
            AuthorityError::ContractMethodUnknown(msg) => write!(f, "CONTRACT_METHOD_UNKNOWN: {msg}"),
            AuthorityError::LedgerConflict(msg) => write!(f, "LEDGER_CONFLICT: {msg}"),
            AuthorityError::NotFound(msg) => write!(f, "NOT_FOUND: {msg}"),
        }
    }
}

impl std::error::Error for AuthorityError {}

impl From<CoreError> for AuthorityError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(m) => AuthorityError::Validation(m),
            CoreError::InsufficientFunds(m) => AuthorityError::InsufficientFunds(m),
            CoreError::DuplicateTransaction(m) => AuthorityError::DuplicateTransaction(m),
            CoreError::LedgerConflict(m) => AuthorityError::LedgerConflict(m),
            CoreError::ContractMethodUnknown(m) => AuthorityError::ContractMethodUnknown(m),
        }
    }
}

impl From<WalletError> for AuthorityError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Expired => AuthorityError::Validation("wallet expired".to_string()),
            WalletError::NotActivated => AuthorityError::Validation("wallet not activated for offline use".to_string()),
            WalletError::InsufficientFunds(m) => AuthorityError::InsufficientFunds(m),
            WalletError::BalanceCapExceeded { attempted, cap } => AuthorityError::Validation(format!(
                "offline balance cap exceeded: {attempted} > {cap}"
            )),
            WalletError::UnknownPendingTransaction(id) => AuthorityError::NotFound(id),
            WalletError::Validation(m) => AuthorityError::Validation(m),
        }
    }
}

impl From<ConsensusError> for AuthorityError {
    fn from(e: ConsensusError) -> Self {
        match e {
            ConsensusError::Timeout => AuthorityError::ConsensusTimeout,
            other => AuthorityError::Validation(other.to_string()),
        }
    }
}
