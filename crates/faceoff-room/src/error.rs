//! Error types for the room layer.
//!
//! Domain-validation failures are expected conditions: they are returned
//! as values, relayed to the offending participant as a plain-text
//! message, and never mutate room state. Transport failure is not an
//! error value at all — a failed send silently removes the unreachable
//! participant from the room.

use faceoff_protocol::{ParticipantId, Phase};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The participant is not a member of the room.
    #[error("participant {0} is not in this room")]
    PlayerNotInRoom(ParticipantId),

    /// The action is not valid in the room's current phase.
    #[error("current phase is {actual}, this action requires {expected}")]
    PhaseMismatch { expected: Phase, actual: Phase },

    /// The participant has not declared readiness for this session.
    #[error("participant {0} has not readied up for this session")]
    NotReady(ParticipantId),

    /// The submitted text is not a legal move for the active variant.
    #[error("{text:?} is not a legal move; choose one of: {legal}")]
    InvalidMove {
        text: String,
        legal: &'static str,
    },

    /// The participant already took this round's turn. Non-fatal.
    #[error("participant {0} has already taken their turn this round")]
    AlreadyTookTurn(ParticipantId),

    /// The participant is already a member of a room.
    #[error("participant {0} is already in a room")]
    AlreadyInRoom(ParticipantId),

    /// No room with this name exists.
    #[error("room {0:?} not found")]
    NotFound(String),

    /// A room with this name already exists.
    #[error("room {0:?} already exists")]
    RoomExists(String),

    /// The room is not accepting new members (mid-teardown).
    #[error("room {0:?} is not accepting members")]
    NotJoinable(String),

    /// The room's command channel is closed or full.
    #[error("room {0:?} is unavailable")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // The Display strings double as the rejection messages sent to
    // participants, so keep them human-readable.
    #[test]
    fn test_rejection_messages_read_well() {
        let err = RoomError::PhaseMismatch {
            expected: Phase::InProgress,
            actual: Phase::Ready,
        };
        assert_eq!(
            err.to_string(),
            "current phase is READY, this action requires IN_PROGRESS"
        );

        let err = RoomError::InvalidMove {
            text: "banana".into(),
            legal: "rock, paper, scissors",
        };
        assert_eq!(
            err.to_string(),
            "\"banana\" is not a legal move; choose one of: rock, paper, scissors"
        );
    }
}
