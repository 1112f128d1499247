// Transaction model: immutable ledger-changing intents. Re-architected
// from a loosely-typed keyed mapping into a tagged sum type (`kind`)
// with typed fields; hashing and signing both go through the canonical
// encoder below rather than ad hoc string formatting.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use cbdc_crypto::{compute_keyed_mac, content_hash, verify_keyed_mac, MacTag, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Registration,
    Issuance,
    Exchange,
    OnlineTransfer,
    OfflineTransfer,
    ContractCall,
}

impl TransactionKind {
    fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Registration => "REGISTRATION",
            TransactionKind::Issuance => "ISSUANCE",
            TransactionKind::Exchange => "EXCHANGE",
            TransactionKind::OnlineTransfer => "ONLINE_TRANSFER",
            TransactionKind::OfflineTransfer => "OFFLINE_TRANSFER",
            TransactionKind::ContractCall => "CONTRACT_CALL",
        }
    }
}

/// What kind of party a REGISTRATION transaction is registering.
/// Supplements `TransactionKind::Registration`, which covers both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrantKind {
    Intermediary,
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Created,
    Queued,
    Committed,
    Confirmed,
    Rejected,
}

/// Immutable once signed. See `sign` / `verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
    pub kind: TransactionKind,
    pub timestamp: u64,
    pub metadata: BTreeMap<String, String>,
    pub offline: bool,
    pub signature: MacTag,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Shared constructor: validates the non-negative/zero-only-for-registration
    /// precondition and stamps a fresh id and timestamp. Amount is `u64` so
    /// negative values are unrepresentable; only the zero-amount rule needs
    /// an explicit check.
    fn build(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
        kind: TransactionKind,
        metadata: BTreeMap<String, String>,
        offline: bool,
    ) -> Result<Self, CoreError> {
        if amount == 0 && kind != TransactionKind::Registration {
            return Err(CoreError::Validation(format!(
                "amount 0 is only allowed for REGISTRATION, got {:?}",
                kind
            )));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            kind,
            timestamp: now_secs(),
            metadata,
            offline,
            signature: String::new(),
            status: TransactionStatus::Created,
        })
    }

    pub fn new_registration(
        registrant_id: impl Into<String>,
        registrant_kind: RegistrantKind,
    ) -> Result<Self, CoreError> {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "registrant_kind".to_string(),
            match registrant_kind {
                RegistrantKind::Intermediary => "intermediary".to_string(),
                RegistrantKind::Owner => "owner".to_string(),
            },
        );
        Self::build(
            "AUTHORITY",
            registrant_id,
            0,
            TransactionKind::Registration,
            metadata,
            false,
        )
    }

    pub fn new_issuance(intermediary_id: impl Into<String>, amount: u64) -> Result<Self, CoreError> {
        Self::build(
            "AUTHORITY",
            intermediary_id,
            amount,
            TransactionKind::Issuance,
            BTreeMap::new(),
            false,
        )
    }

    pub fn new_exchange(
        owner_id: impl Into<String>,
        intermediary_id: impl Into<String>,
        amount: u64,
    ) -> Result<Self, CoreError> {
        let mut metadata = BTreeMap::new();
        let intermediary_id = intermediary_id.into();
        metadata.insert("intermediary_id".to_string(), intermediary_id);
        Self::build(
            owner_id,
            "AUTHORITY",
            amount,
            TransactionKind::Exchange,
            metadata,
            false,
        )
    }

    pub fn new_online_transfer(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> Result<Self, CoreError> {
        Self::build(
            sender,
            recipient,
            amount,
            TransactionKind::OnlineTransfer,
            BTreeMap::new(),
            false,
        )
    }

    pub fn new_offline_transfer(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> Result<Self, CoreError> {
        Self::build(
            sender,
            recipient,
            amount,
            TransactionKind::OfflineTransfer,
            BTreeMap::new(),
            true,
        )
    }

    pub fn new_contract_call(
        caller: impl Into<String>,
        contract_id: impl Into<String>,
        method: impl Into<String>,
        args: &[String],
    ) -> Result<Self, CoreError> {
        let mut metadata = BTreeMap::new();
        metadata.insert("contract_id".to_string(), contract_id.into());
        metadata.insert("method".to_string(), method.into());
        metadata.insert("args".to_string(), args.join(","));
        Self::build(
            caller,
            "CONTRACT",
            0,
            TransactionKind::ContractCall,
            metadata,
            false,
        )
    }

    /// Canonical JSON value over `sender, recipient, amount, transaction_type,
    /// timestamp, metadata` — the fields that feed the content hash and the
    /// block's transaction array. `serde_json::Map` iterates key-sorted
    /// because the `preserve_order` feature is not enabled.
    pub fn canonical_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("sender".to_string(), Value::String(self.sender.clone()));
        map.insert(
            "recipient".to_string(),
            Value::String(self.recipient.clone()),
        );
        map.insert("amount".to_string(), Value::from(self.amount));
        map.insert(
            "transaction_type".to_string(),
            Value::String(self.kind.as_str().to_string()),
        );
        map.insert("timestamp".to_string(), Value::from(self.timestamp as f64));
        let metadata = self
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<_, _>>();
        map.insert("metadata".to_string(), Value::Object(metadata));
        Value::Object(map)
    }

    /// SHA-256 digest of the canonical, key-sorted serialisation of all
    /// fields excluding the signature.
    pub fn content_hash(&self) -> String {
        content_hash(self.canonical_value().to_string().as_bytes())
    }

    /// Sign with the canonical string `sender||recipient||amount||timestamp`
    /// plus a caller-supplied secret, writing a keyed-hash tag into the
    /// transaction.
    pub fn sign(&mut self, secret: &Secret) {
        let canonical = self.signing_string();
        self.signature = compute_keyed_mac(secret, &[canonical.as_bytes()]);
    }

    /// Recompute the tag with the presumed matching secret and compare.
    pub fn verify(&self, secret: &Secret) -> bool {
        if self.signature.is_empty() {
            return false;
        }
        let canonical = self.signing_string();
        verify_keyed_mac(secret, &[canonical.as_bytes()], &self.signature)
    }

    fn signing_string(&self) -> String {
        format!(
            "{}||{}||{}||{}",
            self.sender, self.recipient, self.amount, self.timestamp
        )
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
