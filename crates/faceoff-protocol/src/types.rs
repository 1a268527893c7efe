//! Identity and phase types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a connected participant.
///
/// Newtype over `u64` so a participant id can never be confused with a
/// points total or a timer generation in a signature.
///
/// `#[serde(transparent)]` keeps the wire form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The coarse session phase of a room.
///
/// Two states only:
///
/// ```text
/// Ready ⇄ InProgress
/// ```
///
/// - **Ready**: lobby. The room accepts readiness declarations and the
///   ready countdown may be running.
/// - **InProgress**: a session is live — rounds of turn collection and
///   resolution until one (or zero) eligible participants remain.
///
/// `Ready → InProgress` fires only from the ready coordinator's start
/// condition; `InProgress → Ready` fires only when the round resolver
/// ends the session. Nothing else writes the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Ready,
    InProgress,
}

impl Phase {
    /// Returns `true` if the room is in the lobby, collecting readiness.
    pub fn is_lobby(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` if a session is currently live.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
        }
    }
}
