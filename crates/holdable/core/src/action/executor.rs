//! Start/while/end lifecycle of the active action.
//!
//! At most one action is active per item, whichever slot it came from. The
//! executor never runs steps itself: every call returns the step (if any) and
//! the animation change the caller must apply.

use super::{ActionCatalog, ActionError, ActionStep, ActiveAction, UseSlot};

/// Work produced by an executor transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutorEffects {
    pub step: Option<ActionStep>,
    /// Animation boolean to set and broadcast.
    pub animation: Option<(String, bool)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionExecutor {
    active: Option<ActiveAction>,
    suspended: bool,
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveAction> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Pauses while-steps without ending the action.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Idle → Active with the action the catalog currently selects in `slot`.
    pub fn start(
        &mut self,
        slot: UseSlot,
        catalog: &ActionCatalog,
    ) -> Result<ExecutorEffects, ActionError> {
        if let Some(active) = &self.active {
            return Err(ActionError::Busy {
                active: active.slot,
            });
        }
        let action = catalog
            .selected(slot)
            .cloned()
            .ok_or(ActionError::NoActionsOffered(slot))?;

        let effects = ExecutorEffects {
            step: action.start_step(),
            animation: action.anim_tag().map(|tag| (tag.to_owned(), true)),
        };
        tracing::debug!(%slot, label = action.label(), "action started");
        self.active = Some(ActiveAction { slot, action });
        Ok(effects)
    }

    /// Active → Idle on end input for `slot`.
    pub fn end(&mut self, slot: UseSlot) -> Result<ExecutorEffects, ActionError> {
        match &self.active {
            Some(active) if active.slot == slot => Ok(self.finish()),
            _ => Err(ActionError::NotActive(slot)),
        }
    }

    /// Forces Active → Idle when the active label vanished from its list.
    pub fn validate(&mut self, catalog: &ActionCatalog) -> Option<ExecutorEffects> {
        let active = self.active.as_ref()?;
        if catalog.contains_label(active.slot, active.action.label()) {
            return None;
        }
        tracing::debug!(label = active.action.label(), "action no longer offered");
        Some(self.finish())
    }

    /// While-step of the active action, unless suspended.
    pub fn tick(&self) -> Option<ActionStep> {
        if self.suspended {
            return None;
        }
        self.active.as_ref()?.action.while_step()
    }

    /// Drops the active action without running its end step. Returns the
    /// animation tag that must be cleared.
    pub fn abandon(&mut self) -> Option<String> {
        self.suspended = false;
        self.active
            .take()
            .and_then(|active| active.action.anim_tag().map(str::to_owned))
    }

    fn finish(&mut self) -> ExecutorEffects {
        self.suspended = false;
        match self.active.take() {
            Some(active) => ExecutorEffects {
                step: active.action.end_step(),
                animation: active
                    .action
                    .anim_tag()
                    .map(|tag| (tag.to_owned(), false)),
            },
            None => ExecutorEffects::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CatalogContext, UserAction};
    use crate::env::ContainerInfo;
    use crate::state::ObjectId;
    use proptest::prelude::*;

    fn catalog(target: bool, placing: bool) -> ActionCatalog {
        let info = ContainerInfo {
            id: ObjectId(5),
            name: "Panel".into(),
        };
        let mut catalog = ActionCatalog::new();
        catalog.rebuild(&CatalogContext {
            item_name: "Fuse",
            placing,
            busy: false,
            install_target: target.then_some(&info),
        });
        catalog
    }

    #[test]
    fn start_returns_start_step() {
        let mut executor = ActionExecutor::new();
        let effects = executor.start(UseSlot::Secondary, &catalog(false, false)).unwrap();
        assert_eq!(effects.step, Some(ActionStep::StartPrecisionPlace));
        assert_eq!(effects.animation, None);
        assert_eq!(executor.active().map(|a| a.slot), Some(UseSlot::Secondary));
    }

    #[test]
    fn second_start_is_rejected_while_active() {
        let mut executor = ActionExecutor::new();
        let offered = catalog(true, false);
        executor.start(UseSlot::Primary, &offered).unwrap();
        assert_eq!(
            executor.start(UseSlot::Secondary, &offered),
            Err(ActionError::Busy {
                active: UseSlot::Primary
            })
        );
    }

    #[test]
    fn empty_list_cannot_start() {
        let mut executor = ActionExecutor::new();
        assert_eq!(
            executor.start(UseSlot::Primary, &catalog(false, false)),
            Err(ActionError::NoActionsOffered(UseSlot::Primary))
        );
        assert!(!executor.is_active());
    }

    #[test]
    fn end_only_matches_active_slot() {
        let mut executor = ActionExecutor::new();
        executor.start(UseSlot::Primary, &catalog(true, false)).unwrap();
        assert_eq!(
            executor.end(UseSlot::Secondary),
            Err(ActionError::NotActive(UseSlot::Secondary))
        );
        let effects = executor.end(UseSlot::Primary).unwrap();
        assert_eq!(effects.step, Some(ActionStep::EndInstall));
        assert!(!executor.is_active());
    }

    #[test]
    fn vanished_label_forces_end() {
        let mut executor = ActionExecutor::new();
        executor.start(UseSlot::Primary, &catalog(true, false)).unwrap();

        assert_eq!(executor.validate(&catalog(true, false)), None);
        let forced = executor.validate(&catalog(false, false)).unwrap();

        assert_eq!(forced.step, Some(ActionStep::EndInstall));
        assert!(!executor.is_active());
    }

    #[test]
    fn suspension_pauses_while_step() {
        let mut executor = ActionExecutor::new();
        executor.start(UseSlot::Secondary, &catalog(false, false)).unwrap();
        executor.abandon();

        let mut offered = catalog(false, false);
        offered.scroll(crate::action::ScrollDirection::Down, 11.25);
        executor.start(UseSlot::Secondary, &offered).unwrap();
        assert_eq!(executor.tick(), Some(ActionStep::ChargeThrow));

        executor.set_suspended(true);
        assert!(executor.is_suspended());
        assert_eq!(executor.tick(), None);

        executor.abandon();
        assert!(!executor.is_suspended());
    }

    #[test]
    fn abandon_reports_anim_tag() {
        let mut executor = ActionExecutor::new();
        executor.active = Some(ActiveAction {
            slot: UseSlot::Primary,
            action: UserAction::new("Swing").with_anim("Swinging"),
        });
        assert_eq!(executor.abandon().as_deref(), Some("Swinging"));
        assert!(!executor.is_active());
    }

    proptest! {
        #[test]
        fn ending_always_leaves_no_active_action(
            ops in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..64)
        ) {
            let offered = catalog(true, false);
            let mut executor = ActionExecutor::new();
            for (start, primary) in ops {
                let slot = if primary { UseSlot::Primary } else { UseSlot::Secondary };
                if start {
                    let _ = executor.start(slot, &offered);
                } else if executor.end(slot).is_ok() {
                    prop_assert!(!executor.is_active());
                }
                prop_assert!(executor.active().into_iter().count() <= 1);
            }
        }
    }
}
