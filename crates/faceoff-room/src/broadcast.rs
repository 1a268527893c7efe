//! Fan-out of updates to participant connections.
//!
//! Every send reports success as a `bool`, and a failed send means the
//! participant is unreachable: the room removes them on the spot, with
//! no error surfaced anywhere else. Broadcasts iterate over an id
//! snapshot and prune failures after the pass, so removal never
//! invalidates the iteration.

use faceoff_protocol::{ParticipantId, Update};

use crate::room::RoomActor;
use crate::Connection;

impl<C: Connection> RoomActor<C> {
    /// Sends `update` to every connected participant, spectators
    /// included. Unreachable participants are removed afterwards and
    /// thresholds re-checked once.
    pub(crate) fn broadcast(&mut self, update: Update) {
        let targets: Vec<ParticipantId> = self.conns.keys().copied().collect();
        let mut dead = Vec::new();

        for id in targets {
            if let Some(conn) = self.conns.get(&id) {
                if !conn.send(update.clone()) {
                    dead.push(id);
                }
            }
        }

        if dead.is_empty() {
            return;
        }
        for id in dead {
            tracing::info!(room = %self.name, %id, "send failed during broadcast, removing");
            self.drop_member(id);
        }
        self.settle_after_removal();
    }

    pub(crate) fn broadcast_message(&mut self, text: String) {
        self.broadcast(Update::Message { text });
    }

    /// Sends one update to one participant. Returns `false` if the
    /// participant is absent or unreachable; an unreachable one is
    /// removed before returning.
    pub(crate) fn send_to(&mut self, id: ParticipantId, update: Update) -> bool {
        let Some(conn) = self.conns.get(&id) else {
            return false;
        };
        if conn.send(update) {
            return true;
        }
        tracing::info!(room = %self.name, %id, "send failed, removing participant");
        self.drop_member(id);
        self.settle_after_removal();
        false
    }

    /// Catches a newly joined participant up on current room state:
    /// the phase, then everyone's readiness and turn flags, marked as
    /// synchronization traffic so clients render silently.
    pub(crate) fn sync_new_member(&mut self, id: ParticipantId) {
        if !self.send_to(id, Update::Phase { phase: self.phase }) {
            return;
        }

        let snapshot: Vec<(ParticipantId, bool, bool)> = self
            .members
            .values()
            .filter(|p| !p.spectator)
            .map(|p| (p.id, p.ready, p.took_turn))
            .collect();
        for (member, ready, took_turn) in snapshot {
            if !self.send_to(
                id,
                Update::ReadyStatus {
                    participant_id: member,
                    ready,
                    sync: true,
                },
            ) {
                return;
            }
            if !self.send_to(
                id,
                Update::TurnStatus {
                    participant_id: member,
                    took_turn,
                    sync: true,
                },
            ) {
                return;
            }
        }
    }

    /// Clears every readiness flag and tells clients to do the same.
    pub(crate) fn reset_ready_statuses(&mut self) {
        for p in self.members.values_mut() {
            p.ready = false;
        }
        self.broadcast(Update::ResetReady);
    }

    /// Clears every turn flag and stored gesture, and tells clients.
    pub(crate) fn reset_turn_statuses(&mut self) {
        for p in self.members.values_mut() {
            p.took_turn = false;
            p.gesture = None;
        }
        self.broadcast(Update::ResetTurnStatus);
    }

    /// Pushes every non-spectator's point total to all clients.
    pub(crate) fn sync_points_all(&mut self) {
        let totals: Vec<(ParticipantId, u32)> = self
            .members
            .values()
            .filter(|p| !p.spectator)
            .map(|p| (p.id, p.points))
            .collect();
        for (id, points) in totals {
            self.broadcast(Update::Points {
                participant_id: id,
                points,
            });
        }
    }
}
