use std::collections::BTreeMap;

use glam::Vec3;

use super::{BodyState, Footprint, ObjectId, Ownership, Presence, RenderLayer};

/// Precision-placement parameters of an item.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementRig {
    /// Local axis aligned with the surface normal while placing.
    pub rotation_axis: Vec3,
    /// Distance from the hit point along the aligned axis.
    pub offset: f32,
    /// Spin around the aligned axis in degrees, accumulated from scroll input.
    pub current_rotation: f32,
}

impl PlacementRig {
    pub fn new(rotation_axis: Vec3, offset: f32) -> Self {
        Self {
            rotation_axis: if rotation_axis.length_squared() > f32::EPSILON {
                rotation_axis.normalize()
            } else {
                Vec3::Y
            },
            offset,
            current_rotation: 0.0,
        }
    }
}

impl Default for PlacementRig {
    fn default() -> Self {
        Self::new(Vec3::Y, 0.0)
    }
}

/// Complete state of one holdable item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemState {
    pub id: ObjectId,
    /// Display name used in action labels.
    pub name: String,
    pub body: BodyState,
    pub footprint: Footprint,
    pub presence: Presence,
    pub layer: RenderLayer,
    /// Rendering and physics are suppressed entirely.
    pub hidden: bool,
    /// Cleared while a remote peer holds the item.
    pub able_to_pick_up: bool,
    pub placement: PlacementRig,
    /// Replicated animation booleans.
    pub animation: BTreeMap<String, bool>,
    pub(crate) ownership: Ownership,
}

impl ItemState {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            body: BodyState::default(),
            footprint: Footprint::default(),
            presence: Presence::WORLD,
            layer: RenderLayer::World,
            hidden: false,
            able_to_pick_up: true,
            placement: PlacementRig::default(),
            animation: BTreeMap::new(),
            ownership: Ownership::local(),
        }
    }

    pub fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    pub fn inventory_size(&self) -> (u32, u32) {
        self.footprint.inventory_size()
    }

    pub fn animation_flag(&self, name: &str) -> bool {
        self.animation.get(name).copied().unwrap_or(false)
    }

    /// Ownership invariants plus the presence rules that accompany them.
    pub fn is_consistent(&self) -> bool {
        let placing_ok = !self.ownership.is_placing() || !self.presence.contains(Presence::COLLIDERS);
        self.ownership.is_consistent() && placing_ok
    }

    /// Hides the item as if it did not exist: no colliders, no renderers,
    /// kinematic body.
    pub(crate) fn hide_from_world(&mut self) {
        self.hidden = true;
        self.presence.remove(Presence::COLLIDERS | Presence::RENDERERS);
        self.body.kinematic = true;
    }

    pub(crate) fn show_to_world(&mut self) {
        self.hidden = false;
        self.presence.insert(Presence::COLLIDERS | Presence::RENDERERS);
    }
}
