//! Runs a scripted elimination match in-process and prints every update
//! each client receives. Useful for eyeballing the flow end to end:
//!
//! ```text
//! RUST_LOG=faceoff_room=debug cargo run -p faceoff-console
//! ```

use std::time::Duration;

use faceoff_protocol::Update;
use faceoff_room::{ChannelConnection, RoomConfig, RoomManager, Variant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

const ROOM: &str = "arena";

/// Prints everything one client receives, prefixed with its name.
fn watch(name: &'static str, mut updates: UnboundedReceiver<Update>) {
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            match update {
                Update::Message { text } => println!("[{name}] {text}"),
                other => println!("[{name}] {other:?}"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), faceoff_room::RoomError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut manager = RoomManager::new();
    let room = manager.create_room(
        ROOM,
        RoomConfig {
            variant: Variant::FiveWay,
            min_ready: 3,
            // Compressed timers so the scripted match finishes quickly.
            timer_unit: Duration::from_millis(100),
            ..RoomConfig::default()
        },
    )?;
    tracing::info!(room = room.name(), "demo room up");

    let mut ids = Vec::new();
    for name in ["Ada", "Ben", "Cal"] {
        let (conn, updates) = ChannelConnection::open();
        let id = manager.join_room(ROOM, name, false, conn).await?;
        watch(name, updates);
        ids.push(id);
    }

    for &id in &ids {
        manager.ready(id).await?;
    }

    // Round 1: Ada's spock beats Ben's scissors; Cal sits out with the bye.
    manager.turn_action(ids[0], "spock").await?;
    manager.turn_action(ids[1], "scissors").await?;
    manager.turn_action(ids[2], "lizard").await?;

    // Round 2: Ada vs Cal. Lizard poisons spock.
    manager.turn_action(ids[0], "spock").await?;
    manager.turn_action(ids[2], "lizard").await?;

    // Let the session-end broadcasts drain before the process exits.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let info = manager.room_info(ROOM).await?;
    println!("-- final phase: {}, members: {}", info.phase, info.members.len());
    Ok(())
}
