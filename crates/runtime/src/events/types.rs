//! Event payloads for each topic.

use serde::{Deserialize, Serialize};

use holdable_core::{Authority, ItemEvent, ObjectId, OwnershipState, PeerId, UseSlot};

/// An item moved between world, hands, containers, and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEvent {
    pub item: ObjectId,
    pub from: OwnershipState,
    pub to: OwnershipState,
    pub authority: Authority,
}

/// Uses performed with a held item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEvent {
    Started {
        item: ObjectId,
        slot: UseSlot,
        label: String,
    },
    Ended {
        item: ObjectId,
        slot: UseSlot,
        label: String,
        cancelled: bool,
    },
    Thrown {
        item: ObjectId,
        charge: f32,
    },
    Installed {
        item: ObjectId,
        container: ObjectId,
    },
}

/// Rigid-body milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    /// The item came to rest; its pose no longer needs streaming.
    Settled { item: ObjectId },
}

/// Frame traffic that did not make it into an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetworkEvent {
    FrameRejected {
        peer: PeerId,
        item: ObjectId,
        code: String,
        reason: String,
    },
    SendFailed {
        item: ObjectId,
    },
}

/// Maps an item journal entry onto its bus event.
pub(crate) fn from_item_event(item: ObjectId, event: ItemEvent) -> super::Event {
    use super::Event;

    match event {
        ItemEvent::OwnershipChanged {
            from,
            to,
            authority,
        } => Event::Ownership(OwnershipEvent {
            item,
            from,
            to,
            authority,
        }),
        ItemEvent::ActionStarted { slot, label } => {
            Event::Action(ActionEvent::Started { item, slot, label })
        }
        ItemEvent::ActionEnded {
            slot,
            label,
            cancelled,
        } => Event::Action(ActionEvent::Ended {
            item,
            slot,
            label,
            cancelled,
        }),
        ItemEvent::Thrown { charge } => Event::Action(ActionEvent::Thrown { item, charge }),
        ItemEvent::Installed { container } => {
            Event::Action(ActionEvent::Installed { item, container })
        }
        ItemEvent::Settled => Event::Physics(PhysicsEvent::Settled { item }),
    }
}
