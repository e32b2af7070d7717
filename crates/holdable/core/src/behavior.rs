//! Capabilities a concrete item type adds on top of the shared holdable logic.

use crate::state::ItemState;

/// Hooks a concrete item type answers instead of the shared logic inspecting
/// its type.
///
/// Every method has a default so plain items need no code at all.
pub trait ItemBehavior: Send {
    /// True while the item is mid-operation of its own (tethered, in use,
    /// already attached somewhere). Suppresses the base "Place"/"Throw" uses.
    fn is_busy_with_item_specific_state(&self, _state: &ItemState) -> bool {
        false
    }

    /// Name shown in action labels. Defaults to the item's own name.
    fn display_name<'a>(&'a self, state: &'a ItemState) -> &'a str {
        &state.name
    }

    /// Called after the item left the local hands by a drop.
    fn after_dropped_from_hands(&mut self, _state: &mut ItemState) {}
}

/// Item with no specific behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainItem;

impl ItemBehavior for PlainItem {}
