// Task/channel wiring: a single authority task owns the `SettlementAuthority`
// exclusively and is driven entirely through an `mpsc` command channel, the
// "single writer per state" rule of spec.md §5 applied to the authority's
// own state (ledger, registries, queue). Grounded in `los-node/src/main.rs`'s
// task/channel layout, stripped of its REST/gRPC/Tor/P2P surfaces.
//
// Per-wallet tasks are not modelled here: `cbdc-wallet::Wallet` already
// enforces single-writer access by construction (the authority's map of
// wallets is itself only ever touched from inside this one task), so a
// wallet "task" is just the caller-facing `AuthorityHandle` clone a given
// client holds — there is no separate tokio task per wallet to spawn.

use std::collections::BTreeMap;

use tokio::sync::{mpsc, oneshot};

use crate::authority::{LedgerInfo, SettlementAuthority, WalletKind};
use crate::errors::AuthorityError;
use crate::intermediary::IntermediaryStatus;
use crate::owner::OwnerCategory;
use crate::snapshot::Snapshot;

type Reply<T> = oneshot::Sender<Result<T, AuthorityError>>;

pub enum AuthorityCommand {
    RegisterIntermediary {
        name: String,
        routing_code: String,
        now: u64,
        reply: Reply<String>,
    },
    SetIntermediaryStatus {
        id: String,
        status: IntermediaryStatus,
        reply: Reply<()>,
    },
    RegisterOwner {
        category: OwnerCategory,
        reply: Reply<String>,
    },
    FundNonDigitalReserve {
        intermediary_id: String,
        amount: u64,
        reply: Reply<()>,
    },
    FundNonDigitalBalance {
        owner_id: String,
        amount: u64,
        reply: Reply<()>,
    },
    OpenWallet {
        owner_id: String,
        kind: WalletKind,
        now: u64,
        reply: Reply<()>,
    },
    Exchange {
        owner_id: String,
        intermediary_id: String,
        amount: u64,
        reply: Reply<String>,
    },
    WithdrawToOffline {
        owner_id: String,
        amount: u64,
        now: u64,
        reply: Reply<()>,
    },
    SubmitOnlineTransfer {
        sender: String,
        recipient: String,
        amount: u64,
        reply: Reply<String>,
    },
    SubmitOfflineTransfer {
        sender: String,
        recipient: String,
        amount: u64,
        now: u64,
        reply: Reply<String>,
    },
    ReconnectWallet {
        owner_id: String,
        reply: Reply<Vec<String>>,
    },
    RequestEmission {
        intermediary_id: String,
        amount: u64,
        purpose: String,
        now: u64,
        reply: Reply<String>,
    },
    DecideEmission {
        request_id: String,
        approve: bool,
        now: u64,
        reply: Reply<Option<String>>,
    },
    ContractCreate {
        id: String,
        creator: String,
        initial_storage: BTreeMap<String, u64>,
        reply: Reply<()>,
    },
    ContractCall {
        id: String,
        method: String,
        args: Vec<String>,
        caller: String,
        reply: Reply<String>,
    },
    ProcessPending {
        now: u64,
        reply: Reply<Vec<String>>,
    },
    LedgerInfo {
        reply: Reply<LedgerInfo>,
    },
    Snapshot {
        now: u64,
        reply: Reply<Snapshot>,
    },
}

/// Spawns the authority's single task, returning a cloneable handle. The
/// task owns `authority` for the lifetime of the process (or until every
/// handle is dropped, closing the channel and ending the loop).
pub fn spawn_authority_task(mut authority: SettlementAuthority) -> AuthorityHandle {
    let (tx, mut rx) = mpsc::channel::<AuthorityCommand>(256);

    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                AuthorityCommand::RegisterIntermediary { name, routing_code, now, reply } => {
                    let _ = reply.send(authority.register_intermediary(name, routing_code, now));
                }
                AuthorityCommand::SetIntermediaryStatus { id, status, reply } => {
                    let _ = reply.send(authority.set_intermediary_status(&id, status));
                }
                AuthorityCommand::RegisterOwner { category, reply } => {
                    let _ = reply.send(authority.register_owner(category));
                }
                AuthorityCommand::FundNonDigitalReserve { intermediary_id, amount, reply } => {
                    let _ = reply.send(authority.fund_non_digital_reserve(&intermediary_id, amount));
                }
                AuthorityCommand::FundNonDigitalBalance { owner_id, amount, reply } => {
                    let _ = reply.send(authority.fund_non_digital_balance(&owner_id, amount));
                }
                AuthorityCommand::OpenWallet { owner_id, kind, now, reply } => {
                    let _ = reply.send(authority.open_wallet(&owner_id, kind, now));
                }
                AuthorityCommand::Exchange { owner_id, intermediary_id, amount, reply } => {
                    let _ = reply.send(authority.exchange(&owner_id, &intermediary_id, amount));
                }
                AuthorityCommand::WithdrawToOffline { owner_id, amount, now, reply } => {
                    let _ = reply.send(authority.withdraw_to_offline(&owner_id, amount, now));
                }
                AuthorityCommand::SubmitOnlineTransfer { sender, recipient, amount, reply } => {
                    let _ = reply.send(authority.submit_online_transfer(&sender, &recipient, amount));
                }
                AuthorityCommand::SubmitOfflineTransfer { sender, recipient, amount, now, reply } => {
                    let _ = reply.send(authority.submit_offline_transfer(&sender, &recipient, amount, now));
                }
                AuthorityCommand::ReconnectWallet { owner_id, reply } => {
                    let _ = reply.send(authority.reconnect_wallet(&owner_id));
                }
                AuthorityCommand::RequestEmission { intermediary_id, amount, purpose, now, reply } => {
                    let _ = reply.send(authority.request_emission(&intermediary_id, amount, purpose, now));
                }
                AuthorityCommand::DecideEmission { request_id, approve, now, reply } => {
                    let _ = reply.send(authority.decide_emission(&request_id, approve, now));
                }
                AuthorityCommand::ContractCreate { id, creator, initial_storage, reply } => {
                    let _ = reply.send(authority.contract_create(id, creator, initial_storage));
                }
                AuthorityCommand::ContractCall { id, method, args, caller, reply } => {
                    let _ = reply.send(authority.contract_call(&id, &method, &args, &caller));
                }
                AuthorityCommand::ProcessPending { now, reply } => {
                    let _ = reply.send(authority.process_pending(now));
                }
                AuthorityCommand::LedgerInfo { reply } => {
                    let _ = reply.send(Ok(authority.ledger_info()));
                }
                AuthorityCommand::Snapshot { now, reply } => {
                    let _ = reply.send(Ok(authority.snapshot(now)));
                }
            }
        }
        log::info!("authority task exiting: all handles dropped");
    });

    AuthorityHandle { tx }
}

/// Cheap to clone; every clone shares the same underlying channel to the
/// one task that owns the `SettlementAuthority`.
#[derive(Clone)]
pub struct AuthorityHandle {
    tx: mpsc::Sender<AuthorityCommand>,
}

impl AuthorityHandle {
    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> AuthorityCommand) -> Result<T, AuthorityError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| AuthorityError::Validation("authority task has shut down".to_string()))?;
        reply_rx
            .await
            .map_err(|_| AuthorityError::Validation("authority task dropped the reply channel".to_string()))?
    }

    pub async fn register_intermediary(&self, name: impl Into<String>, routing_code: impl Into<String>, now: u64) -> Result<String, AuthorityError> {
        let name = name.into();
        let routing_code = routing_code.into();
        self.call(|reply| AuthorityCommand::RegisterIntermediary { name, routing_code, now, reply }).await
    }

    pub async fn set_intermediary_status(&self, id: impl Into<String>, status: IntermediaryStatus) -> Result<(), AuthorityError> {
        let id = id.into();
        self.call(|reply| AuthorityCommand::SetIntermediaryStatus { id, status, reply }).await
    }

    pub async fn register_owner(&self, category: OwnerCategory) -> Result<String, AuthorityError> {
        self.call(|reply| AuthorityCommand::RegisterOwner { category, reply }).await
    }

    pub async fn fund_non_digital_reserve(&self, intermediary_id: impl Into<String>, amount: u64) -> Result<(), AuthorityError> {
        let intermediary_id = intermediary_id.into();
        self.call(|reply| AuthorityCommand::FundNonDigitalReserve { intermediary_id, amount, reply }).await
    }

    pub async fn fund_non_digital_balance(&self, owner_id: impl Into<String>, amount: u64) -> Result<(), AuthorityError> {
        let owner_id = owner_id.into();
        self.call(|reply| AuthorityCommand::FundNonDigitalBalance { owner_id, amount, reply }).await
    }

    pub async fn open_wallet(&self, owner_id: impl Into<String>, kind: WalletKind, now: u64) -> Result<(), AuthorityError> {
        let owner_id = owner_id.into();
        self.call(|reply| AuthorityCommand::OpenWallet { owner_id, kind, now, reply }).await
    }

    pub async fn exchange(&self, owner_id: impl Into<String>, intermediary_id: impl Into<String>, amount: u64) -> Result<String, AuthorityError> {
        let owner_id = owner_id.into();
        let intermediary_id = intermediary_id.into();
        self.call(|reply| AuthorityCommand::Exchange { owner_id, intermediary_id, amount, reply }).await
    }

    pub async fn withdraw_to_offline(&self, owner_id: impl Into<String>, amount: u64, now: u64) -> Result<(), AuthorityError> {
        let owner_id = owner_id.into();
        self.call(|reply| AuthorityCommand::WithdrawToOffline { owner_id, amount, now, reply }).await
    }

    pub async fn submit_online_transfer(&self, sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Result<String, AuthorityError> {
        let sender = sender.into();
        let recipient = recipient.into();
        self.call(|reply| AuthorityCommand::SubmitOnlineTransfer { sender, recipient, amount, reply }).await
    }

    pub async fn submit_offline_transfer(
        &self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
        now: u64,
    ) -> Result<String, AuthorityError> {
        let sender = sender.into();
        let recipient = recipient.into();
        self.call(|reply| AuthorityCommand::SubmitOfflineTransfer { sender, recipient, amount, now, reply }).await
    }

    pub async fn reconnect_wallet(&self, owner_id: impl Into<String>) -> Result<Vec<String>, AuthorityError> {
        let owner_id = owner_id.into();
        self.call(|reply| AuthorityCommand::ReconnectWallet { owner_id, reply }).await
    }

    pub async fn request_emission(
        &self,
        intermediary_id: impl Into<String>,
        amount: u64,
        purpose: impl Into<String>,
        now: u64,
    ) -> Result<String, AuthorityError> {
        let intermediary_id = intermediary_id.into();
        let purpose = purpose.into();
        self.call(|reply| AuthorityCommand::RequestEmission { intermediary_id, amount, purpose, now, reply }).await
    }

    pub async fn decide_emission(&self, request_id: impl Into<String>, approve: bool, now: u64) -> Result<Option<String>, AuthorityError> {
        let request_id = request_id.into();
        self.call(|reply| AuthorityCommand::DecideEmission { request_id, approve, now, reply }).await
    }

    pub async fn contract_create(
        &self,
        id: impl Into<String>,
        creator: impl Into<String>,
        initial_storage: BTreeMap<String, u64>,
    ) -> Result<(), AuthorityError> {
        let id = id.into();
        let creator = creator.into();
        self.call(|reply| AuthorityCommand::ContractCreate { id, creator, initial_storage, reply }).await
    }

    pub async fn contract_call(
        &self,
        id: impl Into<String>,
        method: impl Into<String>,
        args: Vec<String>,
        caller: impl Into<String>,
    ) -> Result<String, AuthorityError> {
        let id = id.into();
        let method = method.into();
        let caller = caller.into();
        self.call(|reply| AuthorityCommand::ContractCall { id, method, args, caller, reply }).await
    }

    pub async fn process_pending(&self, now: u64) -> Result<Vec<String>, AuthorityError> {
        self.call(|reply| AuthorityCommand::ProcessPending { now, reply }).await
    }

    pub async fn ledger_info(&self) -> Result<LedgerInfo, AuthorityError> {
        self.call(|reply| AuthorityCommand::LedgerInfo { reply }).await
    }

    pub async fn snapshot(&self, now: u64) -> Result<Snapshot, AuthorityError> {
        self.call(|reply| AuthorityCommand::Snapshot { now, reply }).await
    }
}
