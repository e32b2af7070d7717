//! Deterministic logic for items a player can hold, store, place, and throw.
//!
//! `holdable-core` owns the rules that decide where an item lives (world,
//! hands, container, precision placement), who may change that (local or
//! network authority), which uses a held item offers, and how all of it is
//! mirrored to remote peers. Everything runs on the caller's tick; external
//! systems (holder, containers, UI, raycasts) are injected through [`env`].
//!
//! All state mutation flows through [`HoldableItem`], and supporting crates
//! depend on the types re-exported here.
pub mod action;
pub mod behavior;
pub mod config;
pub mod env;
pub mod error;
pub mod item;
pub mod ownership;
pub mod protocol;
pub mod rest;
pub mod state;

pub use action::{
    ActionCatalog, ActionDisplay, ActionError, ActionExecutor, ActionStep, ActiveAction,
    CatalogContext, ExecutorEffects, ProgressMeter, ScrollDirection, SlotDisplay,
    ThrowController, ThrowImpulse, UseSlot, UserAction,
};
pub use behavior::{ItemBehavior, PlainItem};
pub use config::HoldableConfig;
pub use env::{
    ActionUi, ContainerInfo, ContainerRegistry, Headless, Holder, InventoryUi, ItemEnv,
    PlacementRaycaster, RayHit, StaticHolder, ViewTransform,
};
pub use error::{ErrorContext, ErrorSeverity, HoldableError};
pub use item::{HoldableItem, ItemEvent, TickReport};
pub use ownership::{ApplyError, TransitionError, TransitionKind, placement_pose};
pub use protocol::{
    Attribute, FloatPrecision, ItemMessage, Opcode, PersistedAttributes, ProtocolConfig,
    ProtocolError, ROUTING_TAG, SyncProtocol, decode_frame, encode_frame,
};
pub use rest::{RestDetector, RestSample};
pub use state::{
    Attachment, Authority, BodySnapshot, BodyState, Footprint, ItemState, ObjectId, Ownership,
    OwnershipState, PeerId, PlacementRig, Pose, Presence, RenderLayer,
};
