//! Network counterparts of the ownership transitions.
//!
//! Applying a frame performs the same physical effects as the local
//! transition under network authority. Nothing here emits messages.

use crate::env::ItemEnv;
use crate::item::HoldableItem;
use crate::protocol::{ItemMessage, decode_frame};
use crate::state::{Attachment, Authority, BodySnapshot, PeerId, Presence, RenderLayer};

use super::ApplyError;

impl HoldableItem {
    /// Decodes and applies one frame from `peer`.
    ///
    /// # Errors
    ///
    /// A malformed frame or a missing container skips the frame; the item is
    /// left untouched.
    pub fn apply_frame(
        &mut self,
        peer: PeerId,
        frame: &str,
        env: &mut ItemEnv<'_>,
    ) -> Result<(), ApplyError> {
        let message = decode_frame(frame)?;
        self.apply_network(peer, message, env)
    }

    /// Applies a decoded message from `peer`.
    ///
    /// # Errors
    ///
    /// [`ApplyError::MissingContainer`] when `InInv` names an unknown
    /// container.
    pub fn apply_network(
        &mut self,
        peer: PeerId,
        message: ItemMessage,
        env: &mut ItemEnv<'_>,
    ) -> Result<(), ApplyError> {
        let from = self.state.ownership.state();
        tracing::trace!(item = %self.id(), %peer, opcode = %message.opcode(), "applying frame");

        match message {
            ItemMessage::InPlayerHand => {
                self.leave_container_membership(env);
                self.leave_local_hands(env);
                self.state.show_to_world();
                self.state.presence.remove(Presence::COLLIDERS);
                self.state.body.kinematic = false;
                self.state.presence.insert(Presence::ANIMATION);
                self.rest.stop();
                self.state
                    .ownership
                    .enter_hands(Attachment::RemoteHand(peer), Authority::Network);
                self.state.able_to_pick_up = false;
            }
            ItemMessage::OutPlayerHand(snapshot) => {
                self.exit_hands_network(env, &snapshot, false);
            }
            ItemMessage::Dropped(snapshot) => {
                self.exit_hands_network(env, &snapshot, true);
            }
            ItemMessage::InInv { container } => {
                if !env.containers().contains(container) {
                    tracing::warn!(item = %self.id(), %container, %peer, "InInv names unknown container");
                    return Err(ApplyError::MissingContainer {
                        item: self.state.id,
                        container,
                    });
                }
                if let Some(previous) = self.state.ownership.container() {
                    if previous != container {
                        env.containers_mut().remove_by_id(
                            previous,
                            self.state.id,
                            self.state.inventory_size(),
                        );
                    }
                }
                if self.state.ownership.is_in_hands() {
                    self.leave_local_hands(env);
                    self.leave_remote_hands();
                }
                self.rest.stop();
                self.state.hide_from_world();
                self.state
                    .ownership
                    .enter_container(container, Authority::Network);
                self.state.able_to_pick_up = true;
            }
            ItemMessage::OutInv(snapshot) => {
                self.leave_container_membership(env);
                if self.state.ownership.is_in_hands() {
                    self.leave_local_hands(env);
                    self.leave_remote_hands();
                }
                self.state.ownership.release(Authority::Network);
                self.state.show_to_world();
                self.state.able_to_pick_up = true;
                self.state.body.apply_snapshot(&snapshot);
                self.state.body.kinematic = false;
            }
            ItemMessage::Anim { name, value } => {
                self.state.animation.insert(name, value);
                return Ok(());
            }
            ItemMessage::InvRot { rotated } => {
                self.state.footprint.rotated = rotated;
                return Ok(());
            }
        }

        self.record_transition(from);
        Ok(())
    }

    fn exit_hands_network(&mut self, env: &mut ItemEnv<'_>, snapshot: &BodySnapshot, dropped: bool) {
        self.leave_container_membership(env);
        self.leave_local_hands(env);
        self.leave_remote_hands();
        self.state.ownership.release(Authority::Network);
        if dropped {
            self.state.show_to_world();
        }
        self.state.body.apply_snapshot(snapshot);
        self.state.body.kinematic = false;
    }

    /// Remote hand exit: item returns to the world layer and becomes
    /// pickable again.
    fn leave_remote_hands(&mut self) {
        self.state.layer = RenderLayer::World;
        self.state
            .presence
            .remove(Presence::ANIMATION | Presence::HANDS_BOUND);
        self.state.able_to_pick_up = true;
    }

    /// A remote claim on an item this process was holding. Cleans up the
    /// local hands silently.
    fn leave_local_hands(&mut self, env: &mut ItemEnv<'_>) {
        if !self.state.ownership.is_held_locally() {
            return;
        }
        tracing::debug!(item = %self.id(), "local hold overridden by peer");
        self.state.layer = RenderLayer::World;
        self.refresh_in = None;
        self.abandon_action(false);
        env.ui_mut().stop_countdown();
        env.ui_mut().clear();
        self.state
            .presence
            .remove(Presence::HANDS_BOUND | Presence::ANIMATION);
        self.state.ownership.release(Authority::Network);
        env.holder_mut().on_hands_empty(self.state.id);
        env.inventory_mut().destroy_hand_widget(self.state.id);
    }

    /// Container membership removal is idempotent on the registry side.
    fn leave_container_membership(&mut self, env: &mut ItemEnv<'_>) {
        if let Some(container) = self.state.ownership.container() {
            env.containers_mut()
                .remove_by_id(container, self.state.id, self.state.inventory_size());
        }
    }
}
