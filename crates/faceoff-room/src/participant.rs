//! Per-connection participant state.

use faceoff_protocol::ParticipantId;
use serde::Serialize;

use crate::Gesture;

/// Everything the room tracks about one connected participant.
///
/// Owned exclusively by the room actor while the connection is a member;
/// created on join, destroyed on leave or disconnect. Eliminated
/// participants are frozen — their points and readiness do not change
/// again until the session-end reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    /// Declared readiness for the next (or current) session.
    pub ready: bool,
    /// Whether this round's move has been submitted.
    pub took_turn: bool,
    /// Knocked out of the current session.
    pub eliminated: bool,
    /// Temporarily absent; excluded from turn collection.
    pub away: bool,
    /// Observers never ready up, move, or score.
    pub spectator: bool,
    /// Tournament points, accumulated across rounds of one session.
    pub points: u32,
    /// The move stored for the current round, if submitted.
    pub gesture: Option<Gesture>,
}

impl Participant {
    pub(crate) fn new(id: ParticipantId, display_name: String, spectator: bool) -> Self {
        Self {
            id,
            display_name,
            ready: false,
            took_turn: false,
            eliminated: false,
            away: false,
            spectator,
            points: 0,
            gesture: None,
        }
    }

    /// Eligible for turn collection and pairing: ready, not eliminated,
    /// not away, not a spectator.
    pub fn is_eligible(&self) -> bool {
        self.ready && !self.eliminated && !self.away && !self.spectator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Participant {
        let mut p = Participant::new(ParticipantId(1), "Ada".into(), false);
        p.ready = true;
        p
    }

    #[test]
    fn test_new_participant_starts_idle() {
        let p = Participant::new(ParticipantId(1), "Ada".into(), false);
        assert!(!p.ready);
        assert!(!p.took_turn);
        assert!(!p.eliminated);
        assert!(!p.away);
        assert_eq!(p.points, 0);
        assert_eq!(p.gesture, None);
        assert!(!p.is_eligible());
    }

    #[test]
    fn test_eligibility_requires_all_four_conditions() {
        assert!(player().is_eligible());

        let mut p = player();
        p.ready = false;
        assert!(!p.is_eligible());

        let mut p = player();
        p.eliminated = true;
        assert!(!p.is_eligible());

        let mut p = player();
        p.away = true;
        assert!(!p.is_eligible());

        let mut p = player();
        p.spectator = true;
        assert!(!p.is_eligible());
    }
}
