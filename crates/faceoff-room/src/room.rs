//! Room actor: an isolated Tokio task that owns one contest room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Connection actions (ready, turn, join,
//! leave) and timer expiries all arrive as commands on that channel, so
//! every state mutation is serialized through a single domain — a round
//! close triggered by "last participant took their turn" and one
//! triggered by turn-timer expiry can never both run for the same round.

use std::collections::BTreeMap;

use faceoff_protocol::{ParticipantId, Phase, Update};
use faceoff_timer::Countdown;
use tokio::sync::{mpsc, oneshot};

use crate::{Connection, Participant, RoomConfig, RoomError, Variant};

/// Commands sent to a room actor through its channel.
///
/// Join/leave/configure carry a reply channel; readiness and turn
/// actions are fire-and-forget — their validation failures are reported
/// to the offending participant over their own connection, never to the
/// caller.
pub(crate) enum RoomCommand<C: Connection> {
    Join {
        id: ParticipantId,
        display_name: String,
        spectator: bool,
        conn: C,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        id: ParticipantId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Ready {
        id: ParticipantId,
    },
    TurnAction {
        id: ParticipantId,
        text: String,
    },
    Configure {
        variant: Variant,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    ReadyTimerExpired {
        generation: u64,
    },
    TurnTimerExpired {
        generation: u64,
    },
    Shutdown,
}

/// A snapshot of room state for operators and tests.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub name: String,
    pub phase: Phase,
    /// Round counter; 0 while no session has started.
    pub round: u32,
    pub variant: Variant,
    /// Member records in room iteration order.
    pub members: Vec<Participant>,
}

impl RoomInfo {
    /// Looks up one member's record by id.
    pub fn member(&self, id: ParticipantId) -> Option<&Participant> {
        self.members.iter().find(|p| p.id == id)
    }
}

/// Handle to a running room actor. Cheap to clone.
pub struct RoomHandle<C: Connection> {
    name: String,
    sender: mpsc::Sender<RoomCommand<C>>,
}

impl<C: Connection> Clone for RoomHandle<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<C: Connection> RoomHandle<C> {
    /// The room's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.name.clone())
    }

    /// Adds a participant to the room.
    pub async fn join(
        &self,
        id: ParticipantId,
        display_name: String,
        spectator: bool,
        conn: C,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                id,
                display_name,
                spectator,
                conn,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a participant from the room.
    pub async fn leave(&self, id: ParticipantId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave { id, reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Delivers a readiness action (fire-and-forget).
    pub async fn ready(&self, id: ParticipantId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Ready { id })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Delivers a turn action: a move token, an away/back toggle, or
    /// garbage (fire-and-forget).
    pub async fn turn_action(
        &self,
        id: ParticipantId,
        text: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::TurnAction {
                id,
                text: text.into(),
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Swaps the active game variant. Only valid in the lobby.
    pub async fn configure(&self, variant: Variant) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Configure {
                variant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Requests a state snapshot.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
pub(crate) struct RoomActor<C: Connection> {
    pub(crate) name: String,
    pub(crate) config: RoomConfig,
    pub(crate) phase: Phase,
    pub(crate) round: u32,
    /// Participant-id → record, in id order. The single shared mutable
    /// resource; only this actor writes it.
    pub(crate) members: BTreeMap<ParticipantId, Participant>,
    pub(crate) conns: BTreeMap<ParticipantId, C>,
    pub(crate) ready_timer: Option<Countdown>,
    pub(crate) ready_generation: u64,
    pub(crate) turn_timer: Option<Countdown>,
    pub(crate) turn_generation: u64,
    /// Set while round resolution runs, so removals it causes cannot
    /// re-enter the round-close path.
    pub(crate) resolving: bool,
    pub(crate) accepting: bool,
    pub(crate) sender: mpsc::Sender<RoomCommand<C>>,
    receiver: mpsc::Receiver<RoomCommand<C>>,
}

impl<C: Connection> RoomActor<C> {
    pub(crate) async fn run(mut self) {
        tracing::info!(room = %self.name, "room started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    id,
                    display_name,
                    spectator,
                    conn,
                    reply,
                } => {
                    let result = self.handle_join(id, display_name, spectator, conn);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { id, reply } => {
                    let result = self.handle_leave(id);
                    let _ = reply.send(result);
                }
                RoomCommand::Ready { id } => self.handle_ready(id),
                RoomCommand::TurnAction { id, text } => self.handle_turn_action(id, &text),
                RoomCommand::Configure { variant, reply } => {
                    let _ = reply.send(self.handle_configure(variant));
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::ReadyTimerExpired { generation } => {
                    self.handle_ready_expiry(generation);
                }
                RoomCommand::TurnTimerExpired { generation } => {
                    self.handle_turn_expiry(generation);
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room = %self.name, "room shutting down");
                    break;
                }
            }
        }

        self.accepting = false;
        self.cancel_ready_timer();
        self.cancel_turn_timer();
        tracing::info!(room = %self.name, "room stopped");
    }

    // -- membership ---------------------------------------------------

    fn handle_join(
        &mut self,
        id: ParticipantId,
        display_name: String,
        spectator: bool,
        conn: C,
    ) -> Result<(), RoomError> {
        if !self.accepting {
            return Err(RoomError::NotJoinable(self.name.clone()));
        }
        if self.members.contains_key(&id) {
            return Err(RoomError::AlreadyInRoom(id));
        }

        tracing::info!(
            room = %self.name,
            %id,
            name = %display_name,
            spectator,
            members = self.members.len() + 1,
            "participant joined"
        );
        self.broadcast_message(format!("{display_name} joined the room"));
        self.members
            .insert(id, Participant::new(id, display_name, spectator));
        self.conns.insert(id, conn);

        // Bring the newcomer up to date. A transport failure here is
        // handled like any other: silent removal, no error to the caller.
        self.sync_new_member(id);
        Ok(())
    }

    fn handle_leave(&mut self, id: ParticipantId) -> Result<(), RoomError> {
        let participant = self
            .drop_member(id)
            .ok_or(RoomError::PlayerNotInRoom(id))?;
        self.broadcast_message(format!("{} left the room", participant.display_name));
        self.settle_after_removal();
        Ok(())
    }

    /// Removes a participant's record and connection without any
    /// follow-up. Callers run [`settle_after_removal`](Self::settle_after_removal)
    /// once they are done removing.
    pub(crate) fn drop_member(&mut self, id: ParticipantId) -> Option<Participant> {
        let participant = self.members.remove(&id)?;
        self.conns.remove(&id);
        tracing::info!(
            room = %self.name,
            %id,
            members = self.members.len(),
            "participant removed"
        );
        Some(participant)
    }

    /// Re-evaluates pending thresholds after any removal. An emptied
    /// room cancels all timers and force-ends the session.
    pub(crate) fn settle_after_removal(&mut self) {
        if self.members.is_empty() {
            tracing::info!(room = %self.name, "room emptied");
            self.cancel_ready_timer();
            self.cancel_turn_timer();
            if self.phase.is_active() && !self.resolving {
                self.end_session(None);
            }
            return;
        }
        match self.phase {
            Phase::Ready => self.check_ready_start(),
            Phase::InProgress => self.check_all_took_turn(),
        }
    }

    // -- ready coordinator --------------------------------------------

    fn handle_ready(&mut self, id: ParticipantId) {
        let Some(participant) = self.members.get(&id) else {
            tracing::warn!(room = %self.name, %id, "ready action from non-member");
            return;
        };
        if participant.spectator {
            self.send_to(id, message("Spectators cannot ready up"));
            return;
        }
        if !self.phase.is_lobby() {
            self.reject(
                id,
                RoomError::PhaseMismatch {
                    expected: Phase::Ready,
                    actual: self.phase,
                },
            );
            return;
        }

        let ready = if self.config.toggle_ready {
            !participant.ready
        } else {
            true
        };
        if let Some(p) = self.members.get_mut(&id) {
            p.ready = ready;
        }
        tracing::debug!(room = %self.name, %id, ready, "readiness changed");
        self.broadcast(Update::ReadyStatus {
            participant_id: id,
            ready,
            sync: false,
        });

        self.arm_ready_timer();
        self.check_ready_start();
    }

    /// Start condition: a fixed minimum count of ready participants.
    /// Re-checked after every readiness change and every removal.
    fn check_ready_start(&mut self) {
        if !self.phase.is_lobby() {
            return;
        }
        let ready = self.ready_count();
        if ready >= self.config.min_ready {
            self.start_session();
        }
    }

    fn ready_count(&self) -> usize {
        self.members
            .values()
            .filter(|p| p.ready && !p.spectator)
            .count()
    }

    fn handle_ready_expiry(&mut self, generation: u64) {
        if generation != self.ready_generation {
            tracing::debug!(room = %self.name, generation, "stale ready expiry ignored");
            return;
        }
        self.ready_timer = None;
        self.ready_generation += 1;

        let ready = self.ready_count();
        if ready >= self.config.min_ready {
            // Normally the immediate check has already started the
            // session; this covers a threshold lowered mid-countdown.
            self.start_session();
        } else {
            tracing::info!(room = %self.name, ready, "ready check expired short of threshold");
            self.broadcast_message(format!(
                "Ready check expired ({ready}/{} ready) — still waiting in the lobby",
                self.config.min_ready
            ));
            self.reset_ready_statuses();
        }
    }

    fn arm_ready_timer(&mut self) {
        if self.ready_timer.is_some() {
            return;
        }
        self.ready_generation += 1;
        let generation = self.ready_generation;
        let room = self.name.clone();
        self.ready_timer = Some(Countdown::start(
            self.config.ready_countdown(),
            self.sender.clone(),
            move |remaining| {
                // Advisory tick, for operator visibility only.
                tracing::debug!(room = %room, remaining, "ready countdown");
                None
            },
            move || RoomCommand::ReadyTimerExpired { generation },
        ));
    }

    pub(crate) fn cancel_ready_timer(&mut self) {
        if let Some(mut timer) = self.ready_timer.take() {
            timer.cancel();
        }
        // Outstanding expiry commands from this timer become stale.
        self.ready_generation += 1;
    }

    // -- session / phase ----------------------------------------------

    /// The only code path that writes the phase. Setting the current
    /// phase is a no-op with no broadcast.
    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        tracing::info!(room = %self.name, %phase, "phase changed");
        self.broadcast(Update::Phase { phase });
    }

    fn start_session(&mut self) {
        tracing::info!(room = %self.name, "session starting");
        self.cancel_ready_timer();
        self.round = 0;
        // Tournament scoring: a fresh session starts from zero and the
        // clean slate is announced.
        for p in self.members.values_mut() {
            p.points = 0;
            p.eliminated = false;
        }
        self.sync_points_all();
        self.set_phase(Phase::InProgress);
        self.start_round();
    }

    pub(crate) fn start_round(&mut self) {
        self.round += 1;
        tracing::info!(room = %self.name, round = self.round, "round started");
        self.reset_turn_statuses();
        self.broadcast_message(format!("Round {} — choose your move", self.round));
        self.arm_turn_timer();
    }

    // -- turn coordinator ---------------------------------------------

    fn handle_turn_action(&mut self, id: ParticipantId, text: &str) {
        let trimmed = text.trim();

        // Out-of-band status toggles bypass every gameplay check.
        if trimmed.eq_ignore_ascii_case("/away") || trimmed.eq_ignore_ascii_case("/back") {
            self.handle_away_toggle(id, trimmed.eq_ignore_ascii_case("/away"));
            return;
        }

        let Some(participant) = self.members.get(&id) else {
            tracing::warn!(room = %self.name, %id, "turn action from non-member");
            return;
        };
        if participant.spectator {
            self.send_to(id, message("Spectators cannot participate in the game"));
            return;
        }
        if !self.phase.is_active() {
            self.reject(
                id,
                RoomError::PhaseMismatch {
                    expected: Phase::InProgress,
                    actual: self.phase,
                },
            );
            return;
        }
        if participant.eliminated {
            self.send_to(id, message("You have been eliminated and cannot play"));
            return;
        }
        if !participant.ready {
            self.reject(id, RoomError::NotReady(id));
            return;
        }
        if participant.took_turn {
            self.reject(id, RoomError::AlreadyTookTurn(id));
            return;
        }
        let Some(gesture) = self.config.variant.parse_move(trimmed) else {
            self.reject(
                id,
                RoomError::InvalidMove {
                    text: trimmed.to_string(),
                    legal: self.config.variant.legal_moves_text(),
                },
            );
            return;
        };

        if let Some(p) = self.members.get_mut(&id) {
            p.gesture = Some(gesture);
            p.took_turn = true;
        }
        tracing::debug!(room = %self.name, %id, %gesture, "move accepted");
        self.broadcast(Update::TurnStatus {
            participant_id: id,
            took_turn: true,
            sync: false,
        });
        self.check_all_took_turn();
    }

    fn handle_away_toggle(&mut self, id: ParticipantId, away: bool) {
        let Some(p) = self.members.get_mut(&id) else {
            tracing::warn!(room = %self.name, %id, "away toggle from non-member");
            return;
        };
        p.away = away;
        tracing::info!(room = %self.name, %id, away, "away status changed");
        let text = if away { "You are now away" } else { "Welcome back" };
        self.send_to(id, message(text));
        // Away status changes the eligible count for an open turn window.
        if self.phase.is_active() {
            self.check_all_took_turn();
        }
    }

    /// Closes the round early once every eligible participant has taken
    /// their turn.
    pub(crate) fn check_all_took_turn(&mut self) {
        if !self.phase.is_active() || self.resolving {
            return;
        }
        let eligible = self.members.values().filter(|p| p.is_eligible()).count();
        let took = self
            .members
            .values()
            .filter(|p| p.is_eligible() && p.took_turn)
            .count();
        if eligible > 0 && took == eligible {
            self.broadcast_message(format!(
                "All participants have taken their turn ({took}/{eligible}) — resolving the round"
            ));
            self.close_round();
        }
    }

    fn handle_turn_expiry(&mut self, generation: u64) {
        if generation != self.turn_generation {
            tracing::debug!(room = %self.name, generation, "stale turn expiry ignored");
            return;
        }
        self.turn_timer = None;
        self.turn_generation += 1;
        tracing::info!(room = %self.name, round = self.round, "turn timer expired");
        self.broadcast_message("Time is up — resolving the round".to_string());
        self.close_round();
    }

    fn close_round(&mut self) {
        self.cancel_turn_timer();
        self.resolve_round();
    }

    fn arm_turn_timer(&mut self) {
        // Arming always supersedes: cancel any active countdown first.
        self.cancel_turn_timer();
        let generation = self.turn_generation;
        let room = self.name.clone();
        self.turn_timer = Some(Countdown::start(
            self.config.turn_countdown(),
            self.sender.clone(),
            move |remaining| {
                tracing::debug!(room = %room, remaining, "turn countdown");
                None
            },
            move || RoomCommand::TurnTimerExpired { generation },
        ));
    }

    pub(crate) fn cancel_turn_timer(&mut self) {
        if let Some(mut timer) = self.turn_timer.take() {
            timer.cancel();
        }
        self.turn_generation += 1;
    }

    // -- configuration ------------------------------------------------

    fn handle_configure(&mut self, variant: Variant) -> Result<(), RoomError> {
        if !self.phase.is_lobby() {
            return Err(RoomError::PhaseMismatch {
                expected: Phase::Ready,
                actual: self.phase,
            });
        }
        self.config.variant = variant;
        tracing::info!(room = %self.name, %variant, "variant changed");
        self.broadcast_message(format!("Game variant set to {variant}"));
        Ok(())
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            name: self.name.clone(),
            phase: self.phase,
            round: self.round,
            variant: self.config.variant,
            members: self.members.values().cloned().collect(),
        }
    }

    /// Relays a validation failure to the offending participant. The
    /// error's Display string is the message text; nobody else hears
    /// about it and no state changes.
    fn reject(&mut self, id: ParticipantId, err: RoomError) {
        tracing::debug!(room = %self.name, %id, %err, "action rejected");
        self.send_to(
            id,
            Update::Message {
                text: err.to_string(),
            },
        );
    }

    pub(crate) fn display_name(&self, id: ParticipantId) -> String {
        self.members
            .get(&id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn message(text: &str) -> Update {
    Update::Message {
        text: text.to_string(),
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room<C: Connection>(
    name: String,
    config: RoomConfig,
    channel_size: usize,
) -> RoomHandle<C> {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor::<C> {
        name: name.clone(),
        config: config.validated(),
        phase: Phase::Ready,
        round: 0,
        members: BTreeMap::new(),
        conns: BTreeMap::new(),
        ready_timer: None,
        ready_generation: 0,
        turn_timer: None,
        turn_generation: 0,
        resolving: false,
        accepting: true,
        sender: tx.clone(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}
