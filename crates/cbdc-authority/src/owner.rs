// Owner (end user): non-digital balance, online digital balance, optional
// wallet, category. Grounded in `core/user.py`'s bare `user_type` string,
// typed per Design Note "dynamic mappings -> explicit schemas".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerCategory {
    Individual,
    Legal,
    Government,
}

/// An end user's registry entry. `online_digital` is authoritative only
/// for owners who never open a wallet — once a wallet is opened, the
/// `Wallet` task becomes the sole owner of that balance (see
/// `SettlementAuthority::online_balance`, and DESIGN.md's resolution of
/// the Owner/Wallet balance duality spec.md leaves implicit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub category: OwnerCategory,
    pub non_digital_balance: u64,
    pub online_digital: u64,
    pub has_wallet: bool,
}

impl Owner {
    pub fn new(id: impl Into<String>, category: OwnerCategory) -> Self {
        Self {
            id: id.into(),
            category,
            non_digital_balance: 0,
            online_digital: 0,
            has_wallet: false,
        }
    }
}
