//! Topic-based event bus for session events.
//!
//! Item journals are drained after every tick and republished here, split by
//! topic so consumers subscribe only to what they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ActionEvent, NetworkEvent, OwnershipEvent, PhysicsEvent};

pub(crate) use types::from_item_event;
