// Intermediary (financial organisation): non-digital and digital reserve
// balances, status, routing code. Grounded in
// `core/financial_organization.py`'s `FinancialOrganization`, re-architected
// per Design Note so the authority (not the intermediary object) is the
// sole mutator of balances, and only via committed ISSUANCE/EXCHANGE
// transactions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntermediaryStatus {
    Pending,
    Active,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intermediary {
    pub id: String,
    pub name: String,
    pub routing_code: String,
    pub non_digital_reserve: u64,
    pub digital_reserve: u64,
    pub status: IntermediaryStatus,
    pub registered_at: u64,
}

impl Intermediary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, routing_code: impl Into<String>, now: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            routing_code: routing_code.into(),
            non_digital_reserve: 0,
            digital_reserve: 0,
            status: IntermediaryStatus::Pending,
            registered_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == IntermediaryStatus::Active
    }
}
