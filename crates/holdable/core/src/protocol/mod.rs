//! Network sync protocol and persisted attributes.
//!
//! Ownership transitions and physics snapshots travel between peers as
//! comma-delimited text frames: a fixed `item` routing tag, an [`Opcode`],
//! then positional fields. [`encode_frame`]/[`decode_frame`] convert between
//! frames and [`ItemMessage`]; decoding validates field count and every field
//! so a malformed frame is rejected on its own.
//!
//! [`SyncProtocol`] is the per-item outbox the ownership transitions write to.

mod attributes;
mod codec;
mod error;
mod message;
mod sync;

pub use attributes::{Attribute, PersistedAttributes};
pub use codec::{FloatPrecision, ProtocolConfig, ROUTING_TAG, decode_frame, encode_frame};
pub use error::ProtocolError;
pub use message::{ItemMessage, Opcode};
pub use sync::SyncProtocol;

/// Wire spelling of a boolean.
pub fn bool_to_wire(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Parses the wire spelling of a boolean. Only `True` and `False` are valid.
pub fn bool_from_wire(value: &str) -> Option<bool> {
    match value {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}
