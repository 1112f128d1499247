// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC CORE MODULE
//
// Transaction, Block and Ledger: the append-only, hash-linked settlement
// chain that the consensus engine orders blocks into. All amounts are
// u64 minor units (no floating point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod block;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod transaction;

pub use block::Block;
pub use config::SystemConfig;
pub use errors::CoreError;
pub use ledger::Ledger;
pub use transaction::{RegistrantKind, Transaction, TransactionKind, TransactionStatus};
