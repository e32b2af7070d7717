//! Primary/secondary action lists and the shared selection index.

use crate::env::ContainerInfo;

use super::{UseSlot, UserAction};

/// Inputs of one catalog rebuild.
#[derive(Clone, Copy, Debug)]
pub struct CatalogContext<'a> {
    /// Name used in labels.
    pub item_name: &'a str,
    pub placing: bool,
    /// The concrete item type reports an operation of its own in progress.
    pub busy: bool,
    /// Container the holder looks at that still needs this item.
    pub install_target: Option<&'a ContainerInfo>,
}

/// Scroll-wheel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Previous action, counter-rotate placement.
    Up,
    /// Next action, rotate placement.
    Down,
}

/// Text and scroll hints for one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotDisplay {
    pub text: String,
    pub scroll_up: bool,
    pub scroll_down: bool,
}

impl SlotDisplay {
    /// Shown when a slot has no action.
    pub const EMPTY_TEXT: &'static str = "-";

    fn empty() -> Self {
        Self {
            text: Self::EMPTY_TEXT.to_owned(),
            scroll_up: false,
            scroll_down: false,
        }
    }
}

/// What the action HUD shows for the held item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionDisplay {
    pub name: String,
    pub primary: SlotDisplay,
    pub secondary: SlotDisplay,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionCatalog {
    primary: Vec<UserAction>,
    secondary: Vec<UserAction>,
    index: usize,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both lists and regenerates them from `context`.
    pub fn rebuild(&mut self, context: &CatalogContext<'_>) {
        self.primary.clear();
        self.secondary.clear();

        if context.placing {
            self.primary.push(UserAction::commit_place(context.item_name));
            self.secondary.push(UserAction::cancel_place());
        } else {
            if !context.busy {
                self.secondary.push(UserAction::place());
                self.secondary.push(UserAction::throw());
            }
            if let Some(target) = context.install_target {
                self.primary.push(UserAction::install(
                    context.item_name,
                    &target.name,
                    target.id,
                ));
            }
        }

        self.index = self.index.min(self.max_index());
    }

    pub fn list(&self, slot: UseSlot) -> &[UserAction] {
        match slot {
            UseSlot::Primary => &self.primary,
            UseSlot::Secondary => &self.secondary,
        }
    }

    pub fn contains_label(&self, slot: UseSlot, label: &str) -> bool {
        self.list(slot).iter().any(|action| action.label() == label)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn max_index(&self) -> usize {
        self.primary.len().max(self.secondary.len()).saturating_sub(1)
    }

    /// Moves the shared index and returns the placement rotation delta in
    /// degrees.
    pub fn scroll(&mut self, direction: ScrollDirection, step_degrees: f32) -> f32 {
        match direction {
            ScrollDirection::Down => {
                self.index = (self.index + 1).min(self.max_index());
                step_degrees
            }
            ScrollDirection::Up => {
                self.index = self.index.saturating_sub(1);
                -step_degrees
            }
        }
    }

    fn clamped_index(&self, slot: UseSlot) -> Option<usize> {
        let len = self.list(slot).len();
        (len > 0).then(|| self.index.min(len - 1))
    }

    /// Action the shared index selects in `slot`, clamped to that list.
    pub fn selected(&self, slot: UseSlot) -> Option<&UserAction> {
        self.clamped_index(slot).map(|i| &self.list(slot)[i])
    }

    fn slot_display(&self, slot: UseSlot) -> SlotDisplay {
        match self.clamped_index(slot) {
            Some(i) => SlotDisplay {
                text: self.list(slot)[i].label().to_owned(),
                scroll_up: i > 0,
                scroll_down: i + 1 < self.list(slot).len(),
            },
            None => SlotDisplay::empty(),
        }
    }

    pub fn display(&self, name: &str) -> ActionDisplay {
        ActionDisplay {
            name: name.to_owned(),
            primary: self.slot_display(UseSlot::Primary),
            secondary: self.slot_display(UseSlot::Secondary),
        }
    }
}
