//! Frame transport between sessions.
//!
//! Frames are addressed by `(peer, item)`; the payload is the core wire text
//! (`item,<Opcode>,...`). Inbound frames queue on an unbounded channel that
//! the session drains once per tick, so delivery order per peer is arrival
//! order.

use tokio::sync::mpsc;

use holdable_core::{ObjectId, PeerId};

use crate::error::{Result, SessionError};

/// A frame received from a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundFrame {
    pub peer: PeerId,
    pub item: ObjectId,
    pub payload: String,
}

/// A frame this session sends to every peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundFrame {
    pub item: ObjectId,
    pub payload: String,
}

pub type InboxSender = mpsc::UnboundedSender<InboundFrame>;
pub type InboxReceiver = mpsc::UnboundedReceiver<InboundFrame>;

/// Creates the queue a session reads its inbound frames from.
pub fn inbox() -> (InboxSender, InboxReceiver) {
    mpsc::unbounded_channel()
}

/// Sends frames to all remote peers.
pub trait NetworkChannel: Send {
    fn broadcast(&mut self, frame: OutboundFrame) -> Result<()>;
}

/// In-process channel that delivers to other sessions' inboxes.
#[derive(Clone, Debug)]
pub struct LoopbackChannel {
    local: PeerId,
    peers: Vec<InboxSender>,
}

impl LoopbackChannel {
    pub fn new(local: PeerId) -> Self {
        Self {
            local,
            peers: Vec::new(),
        }
    }

    pub fn connect(mut self, peer: InboxSender) -> Self {
        self.peers.push(peer);
        self
    }
}

impl NetworkChannel for LoopbackChannel {
    fn broadcast(&mut self, frame: OutboundFrame) -> Result<()> {
        self.peers.retain(|peer| !peer.is_closed());
        if self.peers.is_empty() {
            return Err(SessionError::ChannelClosed);
        }
        for peer in &self.peers {
            peer.send(InboundFrame {
                peer: self.local,
                item: frame.item,
                payload: frame.payload.clone(),
            })
            .map_err(|_| SessionError::ChannelClosed)?;
        }
        Ok(())
    }
}

/// Channel for a session with no peers. Frames are discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineChannel;

impl NetworkChannel for OfflineChannel {
    fn broadcast(&mut self, frame: OutboundFrame) -> Result<()> {
        tracing::trace!(item = %frame.item, payload = %frame.payload, "offline; frame discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_stamps_sender() {
        let (tx, mut rx) = inbox();
        let mut channel = LoopbackChannel::new(PeerId(4)).connect(tx);

        channel
            .broadcast(OutboundFrame {
                item: ObjectId(9),
                payload: "item,InPlayerHand".into(),
            })
            .unwrap();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.peer, PeerId(4));
        assert_eq!(frame.item, ObjectId(9));
        assert_eq!(frame.payload, "item,InPlayerHand");
    }

    #[test]
    fn closed_peers_report_channel_closed() {
        let (tx, rx) = inbox();
        drop(rx);
        let mut channel = LoopbackChannel::new(PeerId(1)).connect(tx);

        let result = channel.broadcast(OutboundFrame {
            item: ObjectId(1),
            payload: "item,InvRot,True".into(),
        });
        assert!(matches!(result, Err(SessionError::ChannelClosed)));
    }
}
