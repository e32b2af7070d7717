use glam::Vec3;

use crate::action::ActionDisplay;
use crate::state::ObjectId;

/// Inventory screen of the local player.
pub trait InventoryUi {
    /// Rebuilds the grid display after membership changed.
    fn rebuild_display(&mut self);

    /// Destroys the floating widget that represents the item in hand.
    fn destroy_hand_widget(&mut self, item: ObjectId);
}

/// HUD element that shows the held item's current uses.
pub trait ActionUi {
    fn show(&mut self, display: &ActionDisplay);

    /// Hides the action text (hands are empty).
    fn clear(&mut self);

    fn start_countdown(&mut self, seconds: f32);

    fn stop_countdown(&mut self);
}

/// Result of a placement raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Unit surface normal at the hit point.
    pub normal: Vec3,
}

/// Raycast against the dedicated "placing" collision layer.
pub trait PlacementRaycaster {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// No-op UI and raycaster for peers without a screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl InventoryUi for Headless {
    fn rebuild_display(&mut self) {}

    fn destroy_hand_widget(&mut self, _item: ObjectId) {}
}

impl ActionUi for Headless {
    fn show(&mut self, _display: &ActionDisplay) {}

    fn clear(&mut self) {}

    fn start_countdown(&mut self, _seconds: f32) {}

    fn stop_countdown(&mut self) {}
}

impl PlacementRaycaster for Headless {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}
