//! Uses a held item offers to its holder.
//!
//! # Module Structure
//!
//! - `types`: `UserAction`, `ActionStep`, `UseSlot`, `ActiveAction`
//! - `catalog`: rebuilds the primary/secondary lists and the shared scroll index
//! - `executor`: one-active-action-at-a-time start/while/end lifecycle
//! - `throw`: charge accumulation and release impulse
//! - `progress`: countdown used by timed uses such as install
//! - `error`: `ActionError`
//!
//! Callbacks are data ([`ActionStep`]); the executor only decides *which*
//! step runs and the item runs it afterwards against its own state.
mod catalog;
mod error;
mod executor;
mod progress;
mod throw;
mod types;

pub use catalog::{ActionCatalog, ActionDisplay, CatalogContext, ScrollDirection, SlotDisplay};
pub use error::ActionError;
pub use executor::{ActionExecutor, ExecutorEffects};
pub use progress::ProgressMeter;
pub use throw::{ThrowController, ThrowImpulse};
pub use types::{ActionStep, ActiveAction, UseSlot, UserAction};
