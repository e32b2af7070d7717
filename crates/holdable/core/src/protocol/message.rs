use crate::state::{BodySnapshot, ObjectId};

/// Operation carried in the second field of an item frame.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Opcode {
    /// Sender picked the item up.
    InPlayerHand,
    /// Sender released the item from its hands without dropping it.
    OutPlayerHand,
    /// Sender dropped the item.
    Dropped,
    /// Sender stored the item in a container.
    InInv,
    /// Sender took the item out of a container.
    OutInv,
    /// Animation boolean changed.
    Anim,
    /// Inventory footprint rotation changed.
    InvRot,
}

impl Opcode {
    /// Number of fields following the opcode.
    pub const fn field_count(self) -> usize {
        match self {
            Opcode::InPlayerHand => 0,
            Opcode::OutPlayerHand | Opcode::Dropped | Opcode::OutInv => BodySnapshot::FIELD_COUNT,
            Opcode::InInv | Opcode::InvRot => 1,
            Opcode::Anim => 2,
        }
    }

    /// Hand-exit frames carry reduced-precision floats.
    pub const fn is_hand_exit(self) -> bool {
        matches!(self, Opcode::OutPlayerHand | Opcode::Dropped)
    }
}

/// Decoded item frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemMessage {
    InPlayerHand,
    OutPlayerHand(BodySnapshot),
    Dropped(BodySnapshot),
    InInv { container: ObjectId },
    OutInv(BodySnapshot),
    Anim { name: String, value: bool },
    InvRot { rotated: bool },
}

impl ItemMessage {
    pub fn opcode(&self) -> Opcode {
        match self {
            ItemMessage::InPlayerHand => Opcode::InPlayerHand,
            ItemMessage::OutPlayerHand(_) => Opcode::OutPlayerHand,
            ItemMessage::Dropped(_) => Opcode::Dropped,
            ItemMessage::InInv { .. } => Opcode::InInv,
            ItemMessage::OutInv(_) => Opcode::OutInv,
            ItemMessage::Anim { .. } => Opcode::Anim,
            ItemMessage::InvRot { .. } => Opcode::InvRot,
        }
    }

    /// Snapshot carried by the message, if any.
    pub fn snapshot(&self) -> Option<&BodySnapshot> {
        match self {
            ItemMessage::OutPlayerHand(s) | ItemMessage::Dropped(s) | ItemMessage::OutInv(s) => {
                Some(s)
            }
            _ => None,
        }
    }
}
