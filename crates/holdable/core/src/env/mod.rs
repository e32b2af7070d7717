//! Collaborators an item talks to.
//!
//! Each external system is a small trait: the holding player, the container
//! registry, the inventory UI, the action-text UI, and the placement raycast.
//! The [`ItemEnv`] aggregate bundles them so item logic receives everything it
//! needs explicitly instead of reaching into a global.
mod containers;
mod holder;
mod ui;

pub use containers::{ContainerInfo, ContainerRegistry};
pub use holder::{Holder, StaticHolder, ViewTransform};
pub use ui::{ActionUi, Headless, InventoryUi, PlacementRaycaster, RayHit};

/// Mutable bundle of collaborators passed into every item entry point.
pub struct ItemEnv<'a> {
    holder: &'a mut dyn Holder,
    containers: &'a mut dyn ContainerRegistry,
    inventory: &'a mut dyn InventoryUi,
    ui: &'a mut dyn ActionUi,
    raycaster: &'a dyn PlacementRaycaster,
}

impl<'a> ItemEnv<'a> {
    pub fn new(
        holder: &'a mut dyn Holder,
        containers: &'a mut dyn ContainerRegistry,
        inventory: &'a mut dyn InventoryUi,
        ui: &'a mut dyn ActionUi,
        raycaster: &'a dyn PlacementRaycaster,
    ) -> Self {
        Self {
            holder,
            containers,
            inventory,
            ui,
            raycaster,
        }
    }

    pub fn holder(&self) -> &dyn Holder {
        self.holder
    }

    pub fn holder_mut(&mut self) -> &mut dyn Holder {
        self.holder
    }

    pub fn containers(&self) -> &dyn ContainerRegistry {
        self.containers
    }

    pub fn containers_mut(&mut self) -> &mut dyn ContainerRegistry {
        self.containers
    }

    pub fn inventory_mut(&mut self) -> &mut dyn InventoryUi {
        self.inventory
    }

    pub fn ui_mut(&mut self) -> &mut dyn ActionUi {
        self.ui
    }

    pub fn raycaster(&self) -> &dyn PlacementRaycaster {
        self.raycaster
    }
}
