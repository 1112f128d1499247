// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC WALLET MODULE
//
// Per-owner online/offline balances, pending offline transactions and
// settlement reconciliation. A wallet owns its own state; the authority
// reaches it only through the narrow notify/confirm interface below.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod errors;
pub mod history;
pub mod wallet;

pub use errors::WalletError;
pub use history::{HistoryEntry, HistoryKind};
pub use wallet::{now_secs, Wallet};
