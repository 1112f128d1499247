// ConsensusGroup: an in-process harness that ferries PROPOSE/VOTE/COMMIT
// messages between a fixed set of `Replica` instances and drives one
// round to completion. There is no network (spec.md §4.3: "replicas are
// in-process objects") — this is the seam where a real transport would
// be plugged in later, matching the teacher's observation that message
// passing, not shared mutation, is how replicas interact.

use std::collections::HashSet;

use cbdc_core::Block;
use cbdc_crypto::Secret;

use crate::errors::ConsensusError;
use crate::replica::Replica;

pub struct ConsensusGroup {
    replicas: Vec<Replica>,
}

impl ConsensusGroup {
    pub fn new(
        replica_ids: Vec<String>,
        secret: Secret,
        round_timeout_ms: u64,
    ) -> Result<Self, ConsensusError> {
        let replicas = replica_ids
            .iter()
            .map(|id| Replica::new(id.clone(), replica_ids.clone(), secret.clone(), round_timeout_ms))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { replicas })
    }

    pub fn view(&self) -> u64 {
        self.replicas[0].state.view
    }

    pub fn current_leader(&self) -> &str {
        self.replicas[0].leader_for(self.view())
    }

    fn index_of(&self, replica_id: &str) -> usize {
        self.replicas
            .iter()
            .position(|r| r.state.replica_id == replica_id)
            .expect("replica id must be a member of the group")
    }

    /// Drives one round for `block`: the current leader proposes, every
    /// follower not in `silent_replicas` votes, and — if quorum is
    /// reached — the leader commits and every replica rotates its view.
    /// `silent_replicas` simulates a leader (or follower) that never
    /// responds, exercising the view-change path (spec §8 scenario 5).
    pub fn run_round(
        &mut self,
        block: Block,
        timestamp: u64,
        silent_replicas: &HashSet<String>,
    ) -> Result<(String, Block), ConsensusError> {
        let leader_id = self.current_leader().to_string();
        if silent_replicas.contains(&leader_id) {
            self.trigger_view_change(timestamp);
            return Err(ConsensusError::Timeout);
        }

        let leader_idx = self.index_of(&leader_id);
        let propose_msg = self.replicas[leader_idx].propose(block.clone(), timestamp)?;
        let block_hash = propose_msg.block_hash.clone();

        for i in 0..self.replicas.len() {
            let id = self.replicas[i].state.replica_id.clone();
            if id == leader_id || silent_replicas.contains(&id) {
                continue;
            }
            let vote = self.replicas[i].receive_propose(&propose_msg, block.clone(), timestamp)?;
            self.replicas[leader_idx].receive_vote(&vote)?;
        }

        if !self.replicas[leader_idx].can_commit(&block_hash) {
            self.trigger_view_change(timestamp);
            return Err(ConsensusError::Timeout);
        }

        let _commit_msg = self.replicas[leader_idx].commit(&block_hash, timestamp)?;
        for replica in &mut self.replicas {
            replica.apply_commit();
        }

        Ok((block_hash, block))
    }

    fn trigger_view_change(&mut self, timestamp: u64) {
        for replica in &mut self.replicas {
            let _ = replica.initiate_view_change(timestamp);
        }
    }
}
