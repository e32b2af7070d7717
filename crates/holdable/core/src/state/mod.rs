//! Item state representation.
//!
//! This module owns the data structures that describe a single holdable item:
//! identity, physics body, inventory footprint, world presence, and the
//! ownership record. Higher layers read this state freely but mutate it only
//! through [`crate::HoldableItem`].
mod body;
mod common;
mod footprint;
mod item;
mod ownership;
mod presence;

pub use body::{BodySnapshot, BodyState, Pose};
pub use common::{ObjectId, PeerId};
pub use footprint::Footprint;
pub use item::{ItemState, PlacementRig};
pub use ownership::{Attachment, Authority, Ownership, OwnershipState};
pub use presence::{Presence, RenderLayer};
