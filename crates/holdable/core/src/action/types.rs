//! Core action types.

use crate::state::ObjectId;

// ============================================================================
// Use Slot
// ============================================================================

/// The two independently selectable action lists of a held item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UseSlot {
    Primary,
    Secondary,
}

// ============================================================================
// Action Step
// ============================================================================

/// A unit of work an action runs in one of its phases.
///
/// Steps are executed by [`crate::HoldableItem`] after the executor has
/// updated its own state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionStep {
    StartPrecisionPlace,
    CommitPrecisionPlace,
    CancelPrecisionPlace,
    StartThrow,
    ChargeThrow,
    ReleaseThrow,
    /// Arms the install meter for the given container.
    StartInstall(ObjectId),
    /// Advances the install meter; installs on completion.
    ProgressInstall(ObjectId),
    EndInstall,
}

// ============================================================================
// User Action
// ============================================================================

/// A named use offered to the holder.
///
/// Actions carry no identity across catalog rebuilds; two actions are "the
/// same" when their labels match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAction {
    label: String,
    anim_tag: Option<String>,
    on_start: Option<ActionStep>,
    while_held: Option<ActionStep>,
    on_end: Option<ActionStep>,
}

impl UserAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            anim_tag: None,
            on_start: None,
            while_held: None,
            on_end: None,
        }
    }

    /// Animation boolean set while the action is active. Empty tags are
    /// treated as absent.
    pub fn with_anim(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.anim_tag = (!tag.is_empty()).then_some(tag);
        self
    }

    pub fn on_start(mut self, step: ActionStep) -> Self {
        self.on_start = Some(step);
        self
    }

    pub fn while_held(mut self, step: ActionStep) -> Self {
        self.while_held = Some(step);
        self
    }

    pub fn on_end(mut self, step: ActionStep) -> Self {
        self.on_end = Some(step);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn anim_tag(&self) -> Option<&str> {
        self.anim_tag.as_deref()
    }

    pub fn start_step(&self) -> Option<ActionStep> {
        self.on_start
    }

    pub fn while_step(&self) -> Option<ActionStep> {
        self.while_held
    }

    pub fn end_step(&self) -> Option<ActionStep> {
        self.on_end
    }

    // ===== built-in uses =====

    pub fn place() -> Self {
        Self::new("Place").on_start(ActionStep::StartPrecisionPlace)
    }

    pub fn throw() -> Self {
        Self::new("Throw")
            .on_start(ActionStep::StartThrow)
            .while_held(ActionStep::ChargeThrow)
            .on_end(ActionStep::ReleaseThrow)
    }

    pub fn install(item: &str, target: &str, container: ObjectId) -> Self {
        Self::new(format!("Install {item} In {target}"))
            .on_start(ActionStep::StartInstall(container))
            .while_held(ActionStep::ProgressInstall(container))
            .on_end(ActionStep::EndInstall)
    }

    pub fn commit_place(item: &str) -> Self {
        Self::new(format!("Place {item}")).on_start(ActionStep::CommitPrecisionPlace)
    }

    pub fn cancel_place() -> Self {
        Self::new("Cancel place").on_start(ActionStep::CancelPrecisionPlace)
    }
}

/// The action currently being performed and the list it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveAction {
    pub slot: UseSlot,
    pub action: UserAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_anim_tag_is_absent() {
        assert_eq!(UserAction::new("Use").with_anim("").anim_tag(), None);
        assert_eq!(UserAction::new("Use").with_anim("Swing").anim_tag(), Some("Swing"));
    }

    #[test]
    fn install_label_names_item_and_target() {
        let action = UserAction::install("Fuse", "Generator", ObjectId(9));
        assert_eq!(action.label(), "Install Fuse In Generator");
        assert_eq!(action.start_step(), Some(ActionStep::StartInstall(ObjectId(9))));
        assert_eq!(action.end_step(), Some(ActionStep::EndInstall));
    }

    #[test]
    fn throw_has_all_three_phases() {
        let action = UserAction::throw();
        assert!(action.start_step().is_some());
        assert_eq!(action.while_step(), Some(ActionStep::ChargeThrow));
        assert_eq!(action.end_step(), Some(ActionStep::ReleaseThrow));
    }
}
