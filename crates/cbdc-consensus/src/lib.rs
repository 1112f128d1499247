// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC CONSENSUS MODULE
//
// Leader-rotated BFT consensus: a fixed replica set of size N = 3f+1
// orders candidate blocks via a two-phase PROPOSE/VOTE -> COMMIT round,
// with view-change on round timeout. Replicas are in-process objects;
// message passing is explicit so a transport can be plugged in later.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod engine;
pub mod errors;
pub mod message;
pub mod replica;

pub use engine::ConsensusGroup;
pub use errors::ConsensusError;
pub use message::{ConsensusMessage, ConsensusMessageType};
pub use replica::{Replica, ReplicaRole, ReplicaState};
