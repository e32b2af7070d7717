//! Precision placement.
//!
//! While placing, the item leaves hand control and follows a raycast from the
//! viewpoint each tick. The configured local axis is aligned with the surface
//! normal, spun by the accumulated scroll rotation, and offset from the hit
//! point along that axis.

use glam::{Quat, Vec3};

use crate::env::{ItemEnv, RayHit};
use crate::item::HoldableItem;
use crate::protocol::ItemMessage;
use crate::state::{Authority, OwnershipState, PlacementRig, Pose, Presence};

use super::{TransitionError, TransitionKind};

/// Pose of an item placed on `hit`. `None` for a degenerate normal.
pub fn placement_pose(rig: &PlacementRig, hit: &RayHit) -> Option<Pose> {
    let normal = hit.normal.normalize_or_zero();
    if normal == Vec3::ZERO {
        return None;
    }
    let axis = rig.rotation_axis.normalize_or(Vec3::Y);

    let align = Quat::from_rotation_arc(axis, normal);
    let spin = Quat::from_axis_angle(axis, rig.current_rotation.to_radians());
    let rotation = (align * spin).normalize();

    Some(Pose::new(hit.point + (rotation * axis) * rig.offset, rotation))
}

impl HoldableItem {
    /// Hands off: the item starts following the placement raycast.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is in the local hands.
    pub fn start_precision_place(&mut self, _env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::StartPrecisionPlace, false)?;
        let from = self.state.ownership.state();
        if from != OwnershipState::InHands || !self.state.ownership.is_held_locally() {
            return Err(TransitionError::invalid_state(
                TransitionKind::StartPrecisionPlace,
                self.state.id,
                from,
            ));
        }

        self.state
            .presence
            .remove(Presence::ANIMATION | Presence::COLLIDERS | Presence::HANDS_BOUND);
        self.state.ownership.begin_placing();
        self.record_transition(from);
        Ok(())
    }

    /// Back to the hands; colliders stay off.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is being placed.
    pub fn cancel_precision_place(&mut self, _env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::CancelPrecisionPlace, false)?;
        let from = self.state.ownership.state();
        if !self.state.ownership.is_placing() {
            return Err(TransitionError::invalid_state(
                TransitionKind::CancelPrecisionPlace,
                self.state.id,
                from,
            ));
        }

        self.state
            .presence
            .insert(Presence::ANIMATION | Presence::HANDS_BOUND);
        self.state.ownership.end_placing();
        self.record_transition(from);
        Ok(())
    }

    /// Releases the item at its placed pose with the holder's velocity and
    /// emits `Dropped`.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is being placed.
    pub fn commit_precision_place(&mut self, env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::CommitPrecisionPlace, false)?;
        let from = self.state.ownership.state();
        if !self.state.ownership.is_placing() {
            return Err(TransitionError::invalid_state(
                TransitionKind::CommitPrecisionPlace,
                self.state.id,
                from,
            ));
        }

        self.exit_hands(env);
        self.state.body.velocity = env.holder().velocity();
        self.state.body.kinematic = false;
        self.state.show_to_world();
        self.sync
            .emit(ItemMessage::Dropped(self.state.body.snapshot()));
        self.behavior.after_dropped_from_hands(&mut self.state);
        env.inventory_mut().destroy_hand_widget(self.state.id);

        debug_assert_eq!(self.state.ownership.authority(), Authority::Local);
        self.record_transition(from);
        Ok(())
    }

    /// Moves the item to the current raycast hit. No hit leaves it in place.
    pub(crate) fn update_placement(&mut self, env: &ItemEnv<'_>) {
        let view = env.holder().view();
        let Some(hit) = env
            .raycaster()
            .cast(view.position, view.forward, self.config.placement_distance)
        else {
            return;
        };
        if let Some(pose) = placement_pose(&self.state.placement, &hit) {
            self.state.body.pose = pose;
        }
    }
}
