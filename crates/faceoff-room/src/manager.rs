//! Room lifecycle and participant routing.
//!
//! The manager owns the map of named rooms and the index of which room
//! each participant is in. It allocates participant ids and enforces
//! the one-room-per-participant invariant; everything inside a room is
//! the room actor's business.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use faceoff_protocol::ParticipantId;

use crate::room::{spawn_room, RoomHandle, RoomInfo};
use crate::{Connection, RoomConfig, RoomError, Variant};

/// Command-channel capacity for each spawned room.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

static NEXT_PARTICIPANT_ID: AtomicU64 = AtomicU64::new(1);

fn next_participant_id() -> ParticipantId {
    ParticipantId(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Creates and tracks rooms, and routes participants to them.
pub struct RoomManager<C: Connection> {
    rooms: HashMap<String, RoomHandle<C>>,
    member_rooms: HashMap<ParticipantId, String>,
}

impl<C: Connection> Default for RoomManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> RoomManager<C> {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            member_rooms: HashMap::new(),
        }
    }

    /// Spawns a new room with the given name.
    pub fn create_room(
        &mut self,
        name: impl Into<String>,
        config: RoomConfig,
    ) -> Result<RoomHandle<C>, RoomError> {
        let name = name.into();
        if self.rooms.contains_key(&name) {
            return Err(RoomError::RoomExists(name));
        }
        tracing::info!(room = %name, "creating room");
        let handle = spawn_room(name.clone(), config, DEFAULT_CHANNEL_SIZE);
        self.rooms.insert(name, handle.clone());
        Ok(handle)
    }

    fn room(&self, name: &str) -> Result<&RoomHandle<C>, RoomError> {
        self.rooms
            .get(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))
    }

    /// Allocates a participant id and joins the named room with it.
    /// A participant can be in at most one room.
    pub async fn join_room(
        &mut self,
        room_name: &str,
        display_name: impl Into<String>,
        spectator: bool,
        conn: C,
    ) -> Result<ParticipantId, RoomError> {
        let handle = self.room(room_name)?.clone();
        let id = next_participant_id();
        handle.join(id, display_name.into(), spectator, conn).await?;
        self.member_rooms.insert(id, room_name.to_string());
        Ok(id)
    }

    /// Removes a participant from whatever room they are in.
    pub async fn leave_room(&mut self, id: ParticipantId) -> Result<(), RoomError> {
        let room_name = self
            .member_rooms
            .remove(&id)
            .ok_or(RoomError::PlayerNotInRoom(id))?;
        if let Ok(handle) = self.room(&room_name) {
            // The room may have already dropped them on a failed send;
            // the index entry is stale then, not an error.
            let _ = handle.clone().leave(id).await;
        }
        Ok(())
    }

    /// Forwards a readiness action to the participant's room.
    pub async fn ready(&self, id: ParticipantId) -> Result<(), RoomError> {
        let handle = self.room_of(id)?.clone();
        handle.ready(id).await
    }

    /// Forwards turn text (a move or an away/back toggle) to the
    /// participant's room.
    pub async fn turn_action(
        &self,
        id: ParticipantId,
        text: impl Into<String>,
    ) -> Result<(), RoomError> {
        let handle = self.room_of(id)?.clone();
        handle.turn_action(id, text).await
    }

    /// Swaps the named room's game variant.
    pub async fn configure(&self, room_name: &str, variant: Variant) -> Result<(), RoomError> {
        self.room(room_name)?.configure(variant).await
    }

    /// Snapshots the named room's state.
    pub async fn room_info(&self, room_name: &str) -> Result<RoomInfo, RoomError> {
        self.room(room_name)?.info().await
    }

    /// Shuts the named room down and forgets every member index entry
    /// pointing at it.
    pub async fn destroy_room(&mut self, room_name: &str) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_name)
            .ok_or_else(|| RoomError::NotFound(room_name.to_string()))?;
        self.member_rooms.retain(|_, room| room != room_name);
        handle.shutdown().await
    }

    /// The name of the room a participant is in, if any.
    pub fn member_room(&self, id: ParticipantId) -> Option<&str> {
        self.member_rooms.get(&id).map(String::as_str)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_of(&self, id: ParticipantId) -> Result<&RoomHandle<C>, RoomError> {
        let room_name = self
            .member_rooms
            .get(&id)
            .ok_or(RoomError::PlayerNotInRoom(id))?;
        self.room(room_name)
    }
}
