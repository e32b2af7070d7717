use super::ItemMessage;

/// Outbox of messages an item originated this tick.
///
/// Ownership transitions push onto it in the order they happen; the host
/// drains it once per tick and sends the frames in that same order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncProtocol {
    outbox: Vec<ItemMessage>,
}

impl SyncProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, message: ItemMessage) {
        tracing::trace!(opcode = %message.opcode(), "queued item message");
        self.outbox.push(message);
    }

    pub fn pending(&self) -> &[ItemMessage] {
        &self.outbox
    }

    pub fn drain(&mut self) -> Vec<ItemMessage> {
        std::mem::take(&mut self.outbox)
    }
}
