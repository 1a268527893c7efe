//! Room-scoped contest orchestration.
//!
//! A room hosts repeated sessions of an elimination contest: members
//! ready up in the lobby, a session starts once enough of them have,
//! and each round collects one move per eligible participant before
//! pairing them off and eliminating the losers until one winner
//! remains. Every room is a [`tokio`] actor task owning its own state;
//! callers talk to it through a [`RoomManager`] or a cloned room
//! handle, and participants receive [`faceoff_protocol::Update`]s over
//! whatever [`Connection`] they joined with.
//!
//! ```no_run
//! use faceoff_room::{ChannelConnection, RoomConfig, RoomManager};
//!
//! # async fn demo() -> Result<(), faceoff_room::RoomError> {
//! let mut manager = RoomManager::new();
//! manager.create_room("arena", RoomConfig::default())?;
//!
//! let (conn, _updates) = ChannelConnection::open();
//! let ada = manager.join_room("arena", "Ada", false, conn).await?;
//! manager.ready(ada).await?;
//! # Ok(())
//! # }
//! ```

mod broadcast;
mod config;
mod connection;
mod error;
mod manager;
mod participant;
mod room;
mod round;
mod rules;

pub use config::RoomConfig;
pub use connection::{ChannelConnection, Connection};
pub use error::RoomError;
pub use manager::{RoomManager, DEFAULT_CHANNEL_SIZE};
pub use participant::Participant;
pub use room::{RoomHandle, RoomInfo};
pub use rules::{Gesture, Variant};

pub use faceoff_protocol::{ParticipantId, Phase, Update};
