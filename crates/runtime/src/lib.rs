//! Session layer for holdable items.
//!
//! This crate hosts many [`holdable_core::HoldableItem`]s for one peer and
//! connects them to other peers. Consumers embed [`Session`] to register
//! items and containers, feed input, and tick; frames travel through a
//! [`NetworkChannel`] and land in the receiving session's inbox.
//!
//! Modules are organized by responsibility:
//! - [`session`] owns items and runs the tick pipeline
//! - [`network`] defines frames, the channel trait, and loopback transport
//! - [`containers`] provides the in-memory container registry
//! - [`events`] provides the topic-based event bus
//! - [`driver`] paces a session on a tokio interval
//! - [`config`] loads `SessionConfig` from TOML and the environment
pub mod config;
pub mod containers;
pub mod driver;
pub mod error;
pub mod events;
pub mod network;
pub mod session;

pub use config::SessionConfig;
pub use containers::{ContainerSpec, ContainerStore};
pub use driver::{DriverHandle, spawn};
pub use error::{Result, SessionError};
pub use events::{
    ActionEvent, Event, EventBus, NetworkEvent, OwnershipEvent, PhysicsEvent, Topic,
};
pub use network::{
    InboundFrame, InboxReceiver, InboxSender, LoopbackChannel, NetworkChannel, OfflineChannel,
    OutboundFrame, inbox,
};
pub use session::{Session, SessionStats, TickSummary};
