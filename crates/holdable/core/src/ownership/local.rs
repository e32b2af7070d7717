//! Locally originated transitions.

use crate::env::ItemEnv;
use crate::item::HoldableItem;
use crate::protocol::ItemMessage;
use crate::state::{Attachment, Authority, ObjectId, OwnershipState, Presence, RenderLayer};

use super::{TransitionError, TransitionKind};

impl HoldableItem {
    /// Authority guard run at the top of every local transition.
    ///
    /// Claims are refused only while a remote peer holds the item; every
    /// other transition requires local authority.
    pub(crate) fn check_authority(
        &self,
        kind: TransitionKind,
        claim: bool,
    ) -> Result<(), TransitionError> {
        let ownership = &self.state.ownership;
        if claim {
            if let Attachment::RemoteHand(peer) = ownership.attachment() {
                return Err(TransitionError::remotely_held(
                    kind,
                    peer,
                    self.state.id,
                    ownership.state(),
                ));
            }
            return Ok(());
        }
        if ownership.authority() == Authority::Network {
            return Err(TransitionError::not_authoritative(
                kind,
                self.state.id,
                ownership.state(),
            ));
        }
        Ok(())
    }

    fn reject(&self, kind: TransitionKind) -> TransitionError {
        TransitionError::invalid_state(kind, self.state.id, self.state.ownership.state())
    }

    /// Picks the item up into the local hands.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is free or stored, pick-up is enabled, and no
    /// remote peer holds it.
    pub fn pick_up(&mut self, env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::PickUp, true)?;
        let from = self.state.ownership.state();
        if !matches!(from, OwnershipState::Free | OwnershipState::InContainer) {
            return Err(self.reject(TransitionKind::PickUp));
        }
        if !self.state.able_to_pick_up {
            return Err(TransitionError::not_pickable(self.state.id, from));
        }

        if let Some(container) = self.state.ownership.container() {
            env.containers_mut()
                .remove_by_id(container, self.state.id, self.state.inventory_size());
            env.inventory_mut().rebuild_display();
        }

        self.state.show_to_world();
        self.state.layer = RenderLayer::Hands;
        self.state.body.kinematic = false;
        self.state
            .ownership
            .enter_hands(Attachment::LocalHand, Authority::Local);
        self.state.body.kinematic = true;
        self.state.presence.remove(Presence::COLLIDERS);
        self.state
            .presence
            .insert(Presence::ANIMATION | Presence::HANDS_BOUND);

        self.rest.stop();
        self.abandon_action(false);
        self.refresh_in = Some(0.0);
        env.holder_mut().on_hands_not_empty(self.state.id);

        self.sync.emit(ItemMessage::InPlayerHand);
        self.record_transition(from);
        Ok(())
    }

    /// Drops the item in front of the viewpoint.
    ///
    /// From the hands this emits `Dropped`; from a container it takes the
    /// item out and emits `OutInv`.
    ///
    /// # Errors
    ///
    /// Rejected for free items, for items held by a remote peer, and for
    /// hand drops under network authority.
    pub fn drop(&mut self, env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        let from = self.state.ownership.state();
        match from {
            OwnershipState::InHands | OwnershipState::PrecisionPlacing => {
                self.check_authority(TransitionKind::Drop, false)?;
                if !self.state.ownership.is_held_locally() {
                    return Err(self.reject(TransitionKind::Drop));
                }

                self.exit_hands(env);
                self.reset_in_front(env);
                self.sync
                    .emit(ItemMessage::Dropped(self.state.body.snapshot()));
                self.behavior.after_dropped_from_hands(&mut self.state);
                env.inventory_mut().destroy_hand_widget(self.state.id);
            }
            OwnershipState::InContainer => {
                self.check_authority(TransitionKind::Drop, true)?;
                if let Some(container) = self.state.ownership.container() {
                    env.containers_mut().remove_by_id(
                        container,
                        self.state.id,
                        self.state.inventory_size(),
                    );
                    env.inventory_mut().rebuild_display();
                }
                self.state.ownership.release(Authority::Local);
                self.reset_in_front(env);
                self.rest.start();
                self.sync
                    .emit(ItemMessage::OutInv(self.state.body.snapshot()));
            }
            OwnershipState::Free => return Err(self.reject(TransitionKind::Drop)),
        }

        self.record_transition(from);
        Ok(())
    }

    /// Stores the item in `container`, leaving any previous container first.
    ///
    /// # Errors
    ///
    /// Rejected when the item is already in `container`, the container does
    /// not exist, or a remote peer holds the item.
    pub fn store_in(
        &mut self,
        container: ObjectId,
        env: &mut ItemEnv<'_>,
    ) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::StoreIn, true)?;
        let from = self.state.ownership.state();
        if self.state.ownership.container() == Some(container) {
            return Err(TransitionError::already_in_container(
                container,
                self.state.id,
            ));
        }
        if !env.containers().contains(container) {
            return Err(TransitionError::unknown_container(
                container,
                self.state.id,
                from,
            ));
        }

        if let Some(previous) = self.state.ownership.container() {
            env.containers_mut()
                .remove_by_id(previous, self.state.id, self.state.inventory_size());
        }
        if self.state.ownership.is_held_locally() {
            self.exit_hands(env);
            self.sync
                .emit(ItemMessage::OutPlayerHand(self.state.body.snapshot()));
        }

        self.state.hide_from_world();
        self.state
            .ownership
            .enter_container(container, Authority::Local);
        self.rest.stop();

        self.sync.emit(ItemMessage::InInv { container });
        self.record_transition(from);
        Ok(())
    }

    /// Takes the item out of its container at its current pose.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is stored.
    pub fn remove_from_container(&mut self, env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::RemoveFromContainer, true)?;
        let from = self.state.ownership.state();
        let Some(container) = self.state.ownership.container() else {
            return Err(self.reject(TransitionKind::RemoveFromContainer));
        };

        env.containers_mut()
            .remove_by_id(container, self.state.id, self.state.inventory_size());
        self.state.ownership.release(Authority::Local);
        self.state.show_to_world();
        self.state.body.kinematic = false;

        self.sync
            .emit(ItemMessage::OutInv(self.state.body.snapshot()));
        self.record_transition(from);
        Ok(())
    }

    /// Leaves the hands without dropping; the item stays where it is.
    ///
    /// # Errors
    ///
    /// Rejected unless the item is in the local hands under local authority.
    pub fn take_from_hands(&mut self, env: &mut ItemEnv<'_>) -> Result<(), TransitionError> {
        self.check_authority(TransitionKind::TakeFromHands, false)?;
        if !self.state.ownership.is_held_locally() {
            return Err(self.reject(TransitionKind::TakeFromHands));
        }
        let from = self.state.ownership.state();

        self.exit_hands(env);
        self.sync
            .emit(ItemMessage::OutPlayerHand(self.state.body.snapshot()));
        self.record_transition(from);
        Ok(())
    }

    // ===== helpers =====

    /// Local hand exit shared by drop, store, take, and commit. Leaves the
    /// item free and starts the rest watch; emits nothing but the cleared
    /// animation boolean.
    pub(crate) fn exit_hands(&mut self, env: &mut ItemEnv<'_>) {
        self.state.layer = RenderLayer::World;
        self.refresh_in = None;
        self.abandon_action(true);
        env.ui_mut().stop_countdown();
        env.ui_mut().clear();

        self.state
            .presence
            .remove(Presence::HANDS_BOUND | Presence::ANIMATION);
        self.state.ownership.release(Authority::Local);
        env.holder_mut().on_hands_empty(self.state.id);
        self.rest.start();
    }

    /// Forward-offset spawn pose with zero linear velocity.
    fn reset_in_front(&mut self, env: &ItemEnv<'_>) {
        let view = env.holder().view();
        self.state.body.pose.position = view.ahead(self.config.drop_distance);
        self.state.body.velocity = glam::Vec3::ZERO;
        self.state.show_to_world();
        self.state.body.kinematic = false;
    }
}
