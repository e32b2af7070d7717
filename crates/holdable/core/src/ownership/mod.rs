//! Ownership state machine.
//!
//! Where an item lives (world, hands, container, precision placement) and who
//! may change that. Local transitions check authority first, apply their
//! physical effects, and emit exactly the messages listed on each operation.
//! Their network counterparts in `remote` perform the same effects under
//! network authority and never emit.
//!
//! # Module Structure
//!
//! - `local`: pick up, drop, store, remove, take from hands
//! - `placement`: precision placement and its raycast geometry
//! - `remote`: applying incoming frames to a replica
//! - `error`: `TransitionError`, `ApplyError`

mod error;
mod local;
mod placement;
mod remote;


pub use error::{ApplyError, TransitionError, TransitionKind};
pub use placement::placement_pose;
