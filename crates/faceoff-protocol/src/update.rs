//! Outbound state updates.

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Phase};

/// A state update pushed from the room to a participant's connection.
///
/// Every mutation the room commits flows out through one of these. The
/// transport collaborator delivers each update and reports success or
/// failure; a failed delivery means the target is removed from the room
/// as if it had disconnected.
///
/// `#[serde(tag = "type")]` gives internally tagged JSON, e.g.
/// `{ "type": "ReadyStatus", "participant_id": 3, "ready": true, "sync": false }`.
///
/// The `sync` flag on `ReadyStatus`/`TurnStatus` marks a targeted send
/// used only to bring one newly joined participant up to date; sync
/// updates are never re-announced to the rest of the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Update {
    /// Plain-text announcement (round results, eliminations, rejections).
    Message { text: String },

    /// The room's current phase.
    Phase { phase: Phase },

    /// One participant's readiness.
    ReadyStatus {
        participant_id: ParticipantId,
        ready: bool,
        #[serde(default)]
        sync: bool,
    },

    /// Whether one participant has taken this round's turn.
    TurnStatus {
        participant_id: ParticipantId,
        took_turn: bool,
        #[serde(default)]
        sync: bool,
    },

    /// One participant's current points total.
    Points {
        participant_id: ParticipantId,
        points: u32,
    },

    /// Clear every locally tracked ready flag.
    ResetReady,

    /// Clear every locally tracked took-turn flag.
    ResetTurnStatus,
}

#[cfg(test)]
mod tests {
    //! The presentation layer parses these shapes; a serde attribute
    //! mismatch breaks every client, so the shapes are pinned here.

    use super::*;

    #[test]
    fn test_ready_status_json_format() {
        let update = Update::ReadyStatus {
            participant_id: ParticipantId(3),
            ready: true,
            sync: false,
        };
        let json: serde_json::Value = serde_json::to_value(&update).unwrap();

        assert_eq!(json["type"], "ReadyStatus");
        assert_eq!(json["participant_id"], 3);
        assert_eq!(json["ready"], true);
        assert_eq!(json["sync"], false);
    }

    #[test]
    fn test_sync_flag_defaults_to_false_when_missing() {
        let json = r#"{ "type": "TurnStatus", "participant_id": 5, "took_turn": true }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(
            update,
            Update::TurnStatus {
                participant_id: ParticipantId(5),
                took_turn: true,
                sync: false,
            }
        );
    }

    #[test]
    fn test_phase_update_round_trip() {
        let update = Update::Phase {
            phase: Phase::InProgress,
        };
        let bytes = serde_json::to_vec(&update).unwrap();
        let decoded: Update = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(update, decoded);
    }

    #[test]
    fn test_points_json_format() {
        let update = Update::Points {
            participant_id: ParticipantId(9),
            points: 4,
        };
        let json: serde_json::Value = serde_json::to_value(&update).unwrap();

        assert_eq!(json["type"], "Points");
        assert_eq!(json["participant_id"], 9);
        assert_eq!(json["points"], 4);
    }

    #[test]
    fn test_unit_variants_have_no_payload() {
        let json: serde_json::Value = serde_json::to_value(&Update::ResetReady).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "ResetReady" }));
    }

    #[test]
    fn test_decode_unknown_update_type_returns_error() {
        let unknown = r#"{"type": "Teleport", "x": 1}"#;
        let result: Result<Update, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
