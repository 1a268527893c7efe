//! Shared types spoken between the Faceoff orchestrator and the
//! connection/presentation layer.
//!
//! The orchestrator core never touches sockets or byte encoding — that is
//! the transport collaborator's job. What it *does* own is the shape of
//! every state update pushed to a connection, defined here so both sides
//! agree on it.

mod types;
mod update;

pub use types::{ParticipantId, Phase};
pub use update::Update;
