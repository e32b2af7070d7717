use glam::Vec3;

use crate::state::ObjectId;

/// Viewpoint of the holding player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub position: Vec3,
    /// Unit forward direction of the view.
    pub forward: Vec3,
}

impl ViewTransform {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    /// Point `distance` units ahead of the viewpoint.
    pub fn ahead(&self, distance: f32) -> Vec3 {
        self.position + self.forward * distance
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

/// The local player that holds items.
///
/// Notification hooks default to no-ops; implementations forward them to
/// hand-bobbing, HUD state, and stat tracking.
pub trait Holder {
    /// Current camera transform.
    fn view(&self) -> ViewTransform;

    /// Object the player is looking at, if any.
    fn look_target(&self) -> Option<ObjectId>;

    /// Current linear velocity of the player body.
    fn velocity(&self) -> Vec3;

    fn on_hands_not_empty(&mut self, _item: ObjectId) {}

    fn on_hands_empty(&mut self, _item: ObjectId) {}

    /// Forget the item as the current hand object without dropping it.
    fn clear_hand_item(&mut self, _item: ObjectId) {}

    /// An item left the hands as a throw with the given charge.
    fn object_thrown(&mut self, _item: ObjectId, _charge: f32) {}
}

/// Holder with a fixed view, useful for headless peers and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticHolder {
    pub view: ViewTransform,
    pub look_target: Option<ObjectId>,
    pub velocity: Vec3,
    pub hands_full: bool,
    pub thrown: Vec<(ObjectId, f32)>,
}

impl Holder for StaticHolder {
    fn view(&self) -> ViewTransform {
        self.view
    }

    fn look_target(&self) -> Option<ObjectId> {
        self.look_target
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn on_hands_not_empty(&mut self, _item: ObjectId) {
        self.hands_full = true;
    }

    fn on_hands_empty(&mut self, _item: ObjectId) {
        self.hands_full = false;
    }

    fn clear_hand_item(&mut self, _item: ObjectId) {
        self.hands_full = false;
    }

    fn object_thrown(&mut self, item: ObjectId, charge: f32) {
        self.thrown.push((item, charge));
    }
}
