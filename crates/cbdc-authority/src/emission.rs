// Emission request lifecycle (PENDING -> APPROVED|REJECTED). Grounded in
// `core/financial_organization.py`'s `request_emission`, re-architected
// as an explicit state machine on a standalone record rather than a
// boolean return value, per Design Note "dynamic mappings -> explicit
// schemas".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmissionState {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionRequest {
    pub id: String,
    pub intermediary_id: String,
    pub amount: u64,
    pub purpose: String,
    pub state: EmissionState,
    pub requested_at: u64,
    pub decided_at: Option<u64>,
    /// Set once the authority synthesises and submits the backing
    /// ISSUANCE transaction on approval.
    pub issuance_tx_id: Option<String>,
}

impl EmissionRequest {
    pub fn new(id: impl Into<String>, intermediary_id: impl Into<String>, amount: u64, purpose: impl Into<String>, now: u64) -> Self {
        Self {
            id: id.into(),
            intermediary_id: intermediary_id.into(),
            amount,
            purpose: purpose.into(),
            state: EmissionState::Pending,
            requested_at: now,
            decided_at: None,
            issuance_tx_id: None,
        }
    }
}
