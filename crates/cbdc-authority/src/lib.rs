// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC SETTLEMENT AUTHORITY MODULE
//
// The central bank: owns the ledger and consensus engine, the
// intermediary/owner/contract registries, the pending transaction
// queue, emission requests and the audit log. `runtime` wires this
// struct into the tokio task-per-actor layout described alongside the
// wallet and replica crates.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod audit;
pub mod authority;
pub mod contract;
pub mod emission;
pub mod errors;
pub mod intermediary;
pub mod owner;
pub mod runtime;
pub mod snapshot;

pub use audit::{AuditEntry, AuditLog, AuditSeverity};
pub use authority::{LedgerInfo, SettlementAuthority, WalletKind};
pub use contract::{Contract, ContractEvent, ContractMethod};
pub use emission::{EmissionRequest, EmissionState};
pub use errors::AuthorityError;
pub use intermediary::{Intermediary, IntermediaryStatus};
pub use owner::{Owner, OwnerCategory};
pub use runtime::{AuthorityCommand, AuthorityHandle};
pub use snapshot::{Snapshot, SNAPSHOT_FORMAT_VERSION};
