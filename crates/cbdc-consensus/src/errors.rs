// Typed error kinds for the consensus layer, matching the style of
// cbdc-core's CoreError (no thiserror/anyhow in the dependency graph).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Message MAC did not verify against the engine's shared secret.
    InvalidMessageAuth,
    /// Message carries a view that does not match the replica's current view.
    WrongView { expected: u64, found: u64 },
    /// Caller is not the leader for the current view.
    NotLeader,
    /// (C2): replica already voted for a different block at this height/view.
    AlreadyVotedThisView,
    /// Commit attempted with no locked block on this replica.
    NoLockedBlock,
    /// Round aborted: leader failed to reach quorum within round_timeout_ms.
    Timeout,
    /// replica_count is not of the form 3f+1 for some f >= 1.
    InvalidReplicaCount(usize),
}

impl fmt::Display for ConsensusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConsensusError::InvalidMessageAuth => write!(f, "invalid message authentication"),
            ConsensusError::WrongView { expected, found } => {
                write!(f, "message from wrong view: expected {expected}, found {found}")
            }
            ConsensusError::NotLeader => write!(f, "replica is not the leader for this view"),
            ConsensusError::AlreadyVotedThisView => {
                write!(f, "replica already voted for a different block this view")
            }
            ConsensusError::NoLockedBlock => write!(f, "no locked block to commit"),
            ConsensusError::Timeout => write!(f, "CONSENSUS_TIMEOUT: round aborted"),
            ConsensusError::InvalidReplicaCount(n) => {
                write!(f, "replica_count {n} is not of the form 3f+1 for f >= 1")
            }
        }
    }
}

impl std::error::Error for ConsensusError {}
