// Typed error kinds for the offline-wallet protocol, matching the style
// of cbdc-core's CoreError (no thiserror/anyhow in the dependency graph).

use std::fmt;

use cbdc_core::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Wallet is not activated for offline use (never opened with `kind = offline`).
    NotActivated,
    /// (W3): current time > expiry_time or active = false; no new pending
    /// offline transactions may be created, though already-pending ones
    /// still settle on reconnection.
    Expired,
    /// Balance check failed: insufficient online or offline funds.
    InsufficientFunds(String),
    /// Offline balance would exceed `wallet_max_balance` after the deposit.
    BalanceCapExceeded { attempted: u64, cap: u64 },
    /// A commit referenced a pending transaction id this wallet never queued.
    UnknownPendingTransaction(String),
    /// Precondition failed on transaction construction (see `CoreError::Validation`).
    Validation(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalletError::NotActivated => write!(f, "wallet has no offline capability activated"),
            WalletError::Expired => write!(f, "wallet expired: no new pending offline transactions"),
            WalletError::InsufficientFunds(msg) => write!(f, "INSUFFICIENT_FUNDS: {msg}"),
            WalletError::BalanceCapExceeded { attempted, cap } => write!(
                f,
                "offline balance would be {attempted}, exceeding cap of {cap}"
            ),
            WalletError::UnknownPendingTransaction(id) => {
                write!(f, "no pending transaction with id {id} on this wallet")
            }
            WalletError::Validation(msg) => write!(f, "VALIDATION: {msg}"),
        }
    }
}

impl std::error::Error for WalletError {}

impl From<CoreError> for WalletError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => WalletError::Validation(msg),
            CoreError::InsufficientFunds(msg) => WalletError::InsufficientFunds(msg),
            other => WalletError::Validation(other.to_string()),
        }
    }
}
