//! The holdable item aggregate.
//!
//! [`HoldableItem`] owns one item's state and every component that acts on
//! it. Input (use start/end, scroll), ownership transitions, ticks, and
//! network application all enter here; collaborators are passed in per call
//! through [`ItemEnv`].
//!
//! Ownership transitions live in [`crate::ownership`]; this module holds the
//! tick loop, the action plumbing, and the smaller item operations.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::action::{
    ActionCatalog, ActionError, ActionExecutor, ActionStep, CatalogContext, ExecutorEffects,
    ProgressMeter, ScrollDirection, ThrowController, UseSlot,
};
use crate::behavior::{ItemBehavior, PlainItem};
use crate::config::HoldableConfig;
use crate::env::ItemEnv;
use crate::error::HoldableError;
use crate::protocol::{
    Attribute, ItemMessage, PersistedAttributes, ProtocolConfig, SyncProtocol,
};
use crate::rest::{RestDetector, RestSample};
use crate::state::{
    Authority, BodyState, ItemState, ObjectId, Ownership, OwnershipState, PlacementRig, Presence,
};

// ============================================================================
// Events
// ============================================================================

/// Something observable that happened to an item.
///
/// Events are journaled on the item and drained by the host; they never
/// travel over the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemEvent {
    OwnershipChanged {
        from: OwnershipState,
        to: OwnershipState,
        authority: Authority,
    },
    ActionStarted {
        slot: UseSlot,
        label: String,
    },
    ActionEnded {
        slot: UseSlot,
        label: String,
        /// Ended by validation or by leaving the hands, not by input.
        cancelled: bool,
    },
    Thrown {
        charge: f32,
    },
    Installed {
        container: ObjectId,
    },
    /// The rest watch completed.
    Settled,
}

/// Summary of one simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub settled: bool,
    pub actions_refreshed: bool,
    /// Pose still needs streaming to peers.
    pub streaming: bool,
}

// ============================================================================
// Holdable Item
// ============================================================================

pub struct HoldableItem {
    pub(crate) state: ItemState,
    pub(crate) behavior: Box<dyn ItemBehavior>,
    pub(crate) config: HoldableConfig,
    pub(crate) protocol: ProtocolConfig,
    pub(crate) rest: RestDetector,
    pub(crate) catalog: ActionCatalog,
    pub(crate) executor: ActionExecutor,
    pub(crate) throw: ThrowController,
    pub(crate) install: ProgressMeter,
    pub(crate) sync: SyncProtocol,
    pub(crate) events: Vec<ItemEvent>,
    pub(crate) rng: StdRng,
    /// Seconds until the next action refresh; `None` while not held locally.
    pub(crate) refresh_in: Option<f32>,
}

impl HoldableItem {
    /// Creates a locally owned item.
    pub fn new(mut state: ItemState, config: HoldableConfig) -> Self {
        if state.placement.rotation_axis == PlacementRig::default().rotation_axis {
            let current_rotation = state.placement.current_rotation;
            state.placement = PlacementRig::new(config.default_rotation_axis, state.placement.offset);
            state.placement.current_rotation = current_rotation;
        }
        let seed = u64::from(state.id.raw());
        Self {
            rest: RestDetector::from_config(&config),
            throw: ThrowController::new(&config),
            protocol: ProtocolConfig::from(&config),
            state,
            behavior: Box::new(PlainItem),
            config,
            catalog: ActionCatalog::new(),
            executor: ActionExecutor::new(),
            install: ProgressMeter::new(),
            sync: SyncProtocol::new(),
            events: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            refresh_in: None,
        }
    }

    /// Creates an item that mirrors a remote authority.
    pub fn replica(mut state: ItemState, config: HoldableConfig) -> Self {
        state.ownership = Ownership::replica();
        Self::new(state, config)
    }

    pub fn with_behavior(mut self, behavior: impl ItemBehavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    /// Reseeds the throw-torque generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== accessors =====

    pub fn id(&self) -> ObjectId {
        self.state.id
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn ownership(&self) -> &Ownership {
        &self.state.ownership
    }

    /// Physics integration writes the body through here.
    pub fn body_mut(&mut self) -> &mut BodyState {
        &mut self.state.body
    }

    pub fn config(&self) -> &HoldableConfig {
        &self.config
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    pub fn throw(&self) -> &ThrowController {
        &self.throw
    }

    pub fn install_progress(&self) -> &ProgressMeter {
        &self.install
    }

    /// True while an action is in progress.
    pub fn is_being_used(&self) -> bool {
        self.executor.is_active()
    }

    /// True while the rest watch runs, i.e. the pose should be streamed.
    pub fn needs_pose_stream(&self) -> bool {
        self.rest.is_watching()
    }

    /// Messages originated since the last drain, in transition order.
    pub fn drain_outbox(&mut self) -> Vec<ItemMessage> {
        self.sync.drain()
    }

    pub fn pending_outbox(&self) -> &[ItemMessage] {
        self.sync.pending()
    }

    pub fn drain_events(&mut self) -> Vec<ItemEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the item by `dt` seconds.
    ///
    /// Order: rest sampling, placement raycast, action refresh and
    /// validation (at the UI refresh rate), then the active while-step.
    pub fn tick(&mut self, dt: f32, env: &mut ItemEnv<'_>) -> TickReport {
        let mut report = TickReport::default();

        let (linear, angular) = (self.state.body.linear_speed(), self.state.body.angular_speed());
        if self.rest.sample(linear, angular) == RestSample::Settled {
            tracing::trace!(item = %self.id(), "settled");
            self.events.push(ItemEvent::Settled);
            report.settled = true;
        }

        if self.state.ownership.is_held_locally() {
            if self.state.ownership.is_placing() {
                self.update_placement(env);
            }

            if let Some(remaining) = self.refresh_in.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    *remaining = self.config.ui_refresh_interval_secs;
                    self.refresh_actions(env);
                    report.actions_refreshed = true;
                }
            }

            if self.state.ownership.is_held_locally() {
                if let Some(step) = self.executor.tick() {
                    self.run_step(step, dt, env);
                }
            }
        }

        report.streaming = self.rest.is_watching();
        report
    }

    /// Rebuilds both action lists, validates the active action, and pushes
    /// the display to the action UI.
    pub fn refresh_actions(&mut self, env: &mut ItemEnv<'_>) {
        let install_target = env
            .holder()
            .look_target()
            .and_then(|object| env.containers().resolve(object))
            .filter(|target| env.containers().needs_part(target.id, &self.state));
        let name = self.behavior.display_name(&self.state).to_owned();
        let busy = self.behavior.is_busy_with_item_specific_state(&self.state);

        self.catalog.rebuild(&CatalogContext {
            item_name: &name,
            placing: self.state.ownership.is_placing(),
            busy,
            install_target: install_target.as_ref(),
        });

        let active = self
            .executor
            .active()
            .map(|active| (active.slot, active.action.label().to_owned()));
        if let Some(effects) = self.executor.validate(&self.catalog) {
            if let Some((slot, label)) = active {
                self.events.push(ItemEvent::ActionEnded {
                    slot,
                    label,
                    cancelled: true,
                });
            }
            self.apply_effects(effects, 0.0, env);
        }

        if self.state.ownership.is_held_locally() {
            env.ui_mut().show(&self.catalog.display(&name));
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Starts the selected action of `slot`.
    ///
    /// # Errors
    ///
    /// Rejected when the item is not held locally, the slot offers nothing,
    /// or another action is in progress.
    pub fn use_start(&mut self, slot: UseSlot, env: &mut ItemEnv<'_>) -> Result<(), ActionError> {
        if !self.state.ownership.is_held_locally() {
            return Err(ActionError::NotHeld);
        }
        let effects = self.executor.start(slot, &self.catalog)?;
        if let Some(active) = self.executor.active() {
            self.events.push(ItemEvent::ActionStarted {
                slot,
                label: active.action.label().to_owned(),
            });
        }
        self.apply_effects(effects, 0.0, env);
        Ok(())
    }

    /// Ends the active action of `slot`.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotActive`] if `slot` has no active action.
    pub fn use_end(&mut self, slot: UseSlot, env: &mut ItemEnv<'_>) -> Result<(), ActionError> {
        let label = self
            .executor
            .active()
            .map(|active| active.action.label().to_owned());
        let effects = self.executor.end(slot)?;
        if let Some(label) = label {
            self.events.push(ItemEvent::ActionEnded {
                slot,
                label,
                cancelled: false,
            });
        }
        self.apply_effects(effects, 0.0, env);
        Ok(())
    }

    /// Moves the action selection and turns the placement rotation.
    pub fn scroll(&mut self, direction: ScrollDirection) {
        let delta = self
            .catalog
            .scroll(direction, self.config.rotation_step_degrees);
        self.change_place_rotation(delta);
    }

    /// Pauses or resumes while-steps of the active action.
    pub fn set_action_suspended(&mut self, suspended: bool) {
        self.executor.set_suspended(suspended);
    }

    // ========================================================================
    // Action Plumbing
    // ========================================================================

    fn apply_effects(&mut self, effects: ExecutorEffects, dt: f32, env: &mut ItemEnv<'_>) {
        if let Some(step) = effects.step {
            self.run_step(step, dt, env);
        }
        if let Some((name, value)) = effects.animation {
            self.set_animation(name, value);
        }
    }

    fn run_step(&mut self, step: ActionStep, dt: f32, env: &mut ItemEnv<'_>) {
        let result = match step {
            ActionStep::StartPrecisionPlace => self.start_precision_place(env),
            ActionStep::CommitPrecisionPlace => self.commit_precision_place(env),
            ActionStep::CancelPrecisionPlace => self.cancel_precision_place(env),
            ActionStep::StartThrow => {
                self.throw.start();
                env.ui_mut().start_countdown(self.config.throw_countdown_secs);
                Ok(())
            }
            ActionStep::ChargeThrow => {
                self.throw.accumulate(dt);
                Ok(())
            }
            ActionStep::ReleaseThrow => self.release_throw(env),
            ActionStep::StartInstall(_) => {
                self.install.start(self.config.install_duration_secs);
                env.ui_mut()
                    .start_countdown(self.config.install_duration_secs);
                Ok(())
            }
            ActionStep::ProgressInstall(container) => {
                if self.install.advance(dt) {
                    self.complete_install(container, env)
                } else {
                    Ok(())
                }
            }
            ActionStep::EndInstall => {
                self.install.stop();
                env.ui_mut().stop_countdown();
                Ok(())
            }
        };

        if let Err(error) = result {
            tracing::debug!(
                item = %self.id(),
                ?step,
                code = error.error_code(),
                %error,
                "action step rejected"
            );
        }
    }

    fn release_throw(&mut self, env: &mut ItemEnv<'_>) -> Result<(), crate::TransitionError> {
        env.ui_mut().stop_countdown();
        let forward = env.holder().view().forward;
        let Some(throw) = self.throw.release(forward, &mut self.rng) else {
            return Ok(());
        };

        self.drop(env)?;

        let body = &mut self.state.body;
        body.velocity = env.holder().velocity();
        body.apply_impulse(throw.impulse);
        body.apply_relative_torque_impulse(throw.torque);

        env.holder_mut().object_thrown(self.state.id, throw.charge);
        tracing::debug!(item = %self.id(), charge = throw.charge, "thrown");
        self.events.push(ItemEvent::Thrown {
            charge: throw.charge,
        });
        Ok(())
    }

    fn complete_install(
        &mut self,
        container: ObjectId,
        env: &mut ItemEnv<'_>,
    ) -> Result<(), crate::TransitionError> {
        if !env.containers().needs_part(container, &self.state) {
            tracing::debug!(item = %self.id(), %container, "install target no longer needs part");
            return Ok(());
        }
        env.containers_mut().add_part(container, self.state.id);
        env.holder_mut().clear_hand_item(self.state.id);
        self.take_from_hands(env)?;
        self.store_in(container, env)?;
        tracing::info!(item = %self.id(), %container, "installed");
        self.events.push(ItemEvent::Installed { container });
        Ok(())
    }

    // ========================================================================
    // Item Operations
    // ========================================================================

    /// Sets an animation boolean locally and broadcasts it.
    pub fn set_animation(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        self.state.animation.insert(name.clone(), value);
        self.sync.emit(ItemMessage::Anim { name, value });
    }

    /// Sets the inventory rotation flag and broadcasts it.
    pub fn set_rotation(&mut self, rotated: bool) {
        self.state.footprint.rotated = rotated;
        self.sync.emit(ItemMessage::InvRot { rotated });
    }

    pub fn inventory_size(&self) -> (u32, u32) {
        self.state.inventory_size()
    }

    pub fn set_able_to_pick_up(&mut self, able: bool) {
        self.state.able_to_pick_up = able;
    }

    /// Hides the item while its holder is in space. Unhiding restores only
    /// the renderers.
    pub fn set_space_hidden(&mut self, hide: bool) {
        if hide {
            self.state.hide_from_world();
        } else {
            self.state.presence.insert(Presence::RENDERERS);
        }
    }

    /// Hides renderers while the holder uses an in-game screen.
    pub fn set_screen_in_use(&mut self, in_use: bool) {
        self.state.presence.set(Presence::RENDERERS, !in_use);
    }

    /// Adds `degrees` to the precision-placement spin.
    pub fn change_place_rotation(&mut self, degrees: f32) {
        self.state.placement.current_rotation += degrees;
    }

    /// Stat line shown in item tooltips.
    pub fn describe(&self) -> String {
        let footprint = self.state.footprint;
        format!("Inv Space:\t{}x{}", footprint.width, footprint.height)
    }

    pub fn to_attributes(&self) -> Vec<Attribute> {
        PersistedAttributes {
            hidden: self.state.hidden,
            container_in: self.state.ownership.container(),
            inv_rot: self.state.footprint.rotated,
        }
        .to_attributes()
    }

    /// Restores saved attributes. A container missing from the session is
    /// logged and the item stays free.
    pub fn apply_attributes(
        &mut self,
        attributes: &[Attribute],
        containers: &dyn crate::env::ContainerRegistry,
    ) {
        let saved = PersistedAttributes::parse(attributes);
        self.state.footprint.rotated = saved.inv_rot;

        if let Some(container) = saved.container_in {
            if containers.contains(container) {
                let authority = self.state.ownership.authority();
                self.state.ownership.enter_container(container, authority);
            } else {
                tracing::warn!(item = %self.id(), %container, "saved container not found; item left free");
            }
        }

        if saved.hidden {
            self.state.hide_from_world();
        } else {
            self.state.show_to_world();
        }
    }

    // ===== shared helpers for the ownership transitions =====

    pub(crate) fn record_transition(&mut self, from: OwnershipState) {
        let to = self.state.ownership.state();
        let authority = self.state.ownership.authority();
        debug_assert!(self.state.is_consistent(), "inconsistent item {}", self.id());
        tracing::debug!(item = %self.id(), %from, %to, %authority, "ownership transition");
        self.events.push(ItemEvent::OwnershipChanged {
            from,
            to,
            authority,
        });
    }

    /// Drops any active action without running its end step. The cleared
    /// animation boolean is broadcast only for local transitions.
    pub(crate) fn abandon_action(&mut self, broadcast: bool) {
        let active = self
            .executor
            .active()
            .map(|active| (active.slot, active.action.label().to_owned()));
        let tag = self.executor.abandon();
        self.install.stop();
        self.throw.cancel();

        if let Some((slot, label)) = active {
            self.events.push(ItemEvent::ActionEnded {
                slot,
                label,
                cancelled: true,
            });
        }
        if let Some(tag) = tag {
            if broadcast {
                self.set_animation(tag, false);
            } else {
                self.state.animation.insert(tag, false);
            }
        }
    }
}

impl std::fmt::Debug for HoldableItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldableItem")
            .field("state", &self.state)
            .field("executor", &self.executor)
            .field("pending", &self.sync.pending().len())
            .finish_non_exhaustive()
    }
}
