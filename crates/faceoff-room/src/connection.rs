//! The outbound boundary between a room and its transport collaborator.

use faceoff_protocol::Update;
use tokio::sync::mpsc;

/// A handle for delivering updates to one participant's connection.
///
/// The room never blocks on I/O: implementations must accept or refuse
/// the update immediately. Returning `false` means the connection is
/// gone, and the room removes the participant exactly as if it had
/// disconnected.
///
/// Handed to the room at join time — presentation code holds the handle
/// it was constructed with and never reaches for ambient global state.
pub trait Connection: Send + 'static {
    /// Delivers one update. Returns `false` on transport failure.
    fn send(&self, update: Update) -> bool;
}

/// In-process [`Connection`] over an unbounded tokio channel.
///
/// The write half lives in the room; the transport (or a test) drains
/// the read half. Dropping the receiver makes every later send fail,
/// which is how disconnects surface to the room.
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    sender: mpsc::UnboundedSender<Update>,
}

impl ChannelConnection {
    /// Opens a connection pair: the send half for the room, the receive
    /// half for whoever renders updates.
    pub fn open() -> (Self, mpsc::UnboundedReceiver<Update>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Connection for ChannelConnection {
    fn send(&self, update: Update) -> bool {
        self.sender.send(update).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_succeeds_while_receiver_lives() {
        let (conn, mut rx) = ChannelConnection::open();
        assert!(conn.send(Update::ResetReady));
        assert_eq!(rx.try_recv().unwrap(), Update::ResetReady);
    }

    #[test]
    fn test_send_fails_after_receiver_dropped() {
        let (conn, rx) = ChannelConnection::open();
        drop(rx);
        assert!(!conn.send(Update::ResetReady));
    }
}
