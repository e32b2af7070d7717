//! In-memory container registry.
//!
//! Tracks which objects carry a container, the object hierarchy used to find
//! the container behind a looked-at object, the parts each container still
//! needs, and the items currently stored in each container.

use std::collections::{BTreeMap, BTreeSet};

use holdable_core::{ContainerInfo, ContainerRegistry, ItemState, ObjectId};

use crate::error::{Result, SessionError};

/// Registration data for one container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    pub id: ObjectId,
    pub name: String,
    /// Item names this container accepts as installable parts, one entry per
    /// slot.
    pub required_parts: Vec<String>,
}

impl ContainerSpec {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            required_parts: Vec::new(),
        }
    }

    pub fn requiring(mut self, part: impl Into<String>) -> Self {
        self.required_parts.push(part.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
struct ContainerRecord {
    name: String,
    missing_parts: Vec<String>,
    installed: Vec<ObjectId>,
    /// Stored items and the footprint they occupy.
    stored: BTreeMap<ObjectId, (u32, u32)>,
}

#[derive(Clone, Debug, Default)]
pub struct ContainerStore {
    containers: BTreeMap<ObjectId, ContainerRecord>,
    parents: BTreeMap<ObjectId, ObjectId>,
    item_names: BTreeMap<ObjectId, String>,
}

impl ContainerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: ContainerSpec) -> Result<()> {
        if self.containers.contains_key(&spec.id) {
            return Err(SessionError::DuplicateContainer(spec.id));
        }
        self.containers.insert(
            spec.id,
            ContainerRecord {
                name: spec.name,
                missing_parts: spec.required_parts,
                ..ContainerRecord::default()
            },
        );
        Ok(())
    }

    /// Declares `child` as attached under `parent` in the object hierarchy.
    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) {
        self.parents.insert(child, parent);
    }

    /// Names used when an installed part is matched against a slot.
    pub(crate) fn note_item(&mut self, item: ObjectId, name: &str) {
        self.item_names.insert(item, name.to_owned());
    }

    /// Records `item` as stored in `container`, or drops the record when the
    /// item is stored nowhere.
    pub(crate) fn sync_member(
        &mut self,
        item: ObjectId,
        container: Option<ObjectId>,
        size: (u32, u32),
    ) {
        for (id, record) in &mut self.containers {
            if Some(*id) != container {
                record.stored.remove(&item);
            }
        }
        if let Some(record) = container.and_then(|id| self.containers.get_mut(&id)) {
            record.stored.insert(item, size);
        }
    }

    /// Items stored in `container`, in id order.
    pub fn contents(&self, container: ObjectId) -> Vec<ObjectId> {
        self.containers
            .get(&container)
            .map(|record| record.stored.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Grid cells occupied in `container`.
    pub fn occupied_cells(&self, container: ObjectId) -> u32 {
        self.containers
            .get(&container)
            .map(|record| record.stored.values().map(|(w, h)| w * h).sum())
            .unwrap_or(0)
    }

    pub fn installed_parts(&self, container: ObjectId) -> &[ObjectId] {
        self.containers
            .get(&container)
            .map(|record| record.installed.as_slice())
            .unwrap_or(&[])
    }

    pub fn missing_parts(&self, container: ObjectId) -> &[String] {
        self.containers
            .get(&container)
            .map(|record| record.missing_parts.as_slice())
            .unwrap_or(&[])
    }
}

impl ContainerRegistry for ContainerStore {
    fn contains(&self, container: ObjectId) -> bool {
        self.containers.contains_key(&container)
    }

    fn resolve(&self, object: ObjectId) -> Option<ContainerInfo> {
        let mut current = Some(object);
        let mut visited = BTreeSet::new();
        while let Some(id) = current {
            if !visited.insert(id) {
                tracing::warn!(%object, "cycle in object hierarchy");
                return None;
            }
            if let Some(record) = self.containers.get(&id) {
                return Some(ContainerInfo {
                    id,
                    name: record.name.clone(),
                });
            }
            current = self.parents.get(&id).copied();
        }
        None
    }

    fn needs_part(&self, container: ObjectId, item: &ItemState) -> bool {
        self.containers
            .get(&container)
            .is_some_and(|record| record.missing_parts.iter().any(|part| *part == item.name))
    }

    fn add_part(&mut self, container: ObjectId, item: ObjectId) {
        let Some(record) = self.containers.get_mut(&container) else {
            tracing::warn!(%container, %item, "part added to unknown container");
            return;
        };
        if let Some(name) = self.item_names.get(&item) {
            if let Some(slot) = record.missing_parts.iter().position(|part| part == name) {
                record.missing_parts.remove(slot);
            }
        }
        record.installed.push(item);
    }

    fn remove_by_id(&mut self, container: ObjectId, item: ObjectId, _size: (u32, u32)) {
        if let Some(record) = self.containers.get_mut(&container) {
            if record.stored.remove(&item).is_some() {
                tracing::trace!(%container, %item, "freed container cells");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: ObjectId = ObjectId(100);

    fn store() -> ContainerStore {
        let mut store = ContainerStore::new();
        store
            .add(ContainerSpec::new(PANEL, "Fuse Box").requiring("Fuse"))
            .unwrap();
        store.set_parent(ObjectId(101), PANEL);
        store.set_parent(ObjectId(102), ObjectId(101));
        store
    }

    #[test]
    fn resolve_walks_up_the_hierarchy() {
        let store = store();
        let info = store.resolve(ObjectId(102)).unwrap();
        assert_eq!(info.id, PANEL);
        assert_eq!(info.name, "Fuse Box");
        assert_eq!(store.resolve(ObjectId(5)), None);
    }

    #[test]
    fn resolve_stops_on_cycles() {
        let mut store = ContainerStore::new();
        store.set_parent(ObjectId(1), ObjectId(2));
        store.set_parent(ObjectId(2), ObjectId(1));
        assert_eq!(store.resolve(ObjectId(1)), None);
    }

    #[test]
    fn installing_fills_one_slot() {
        let mut store = store();
        let fuse = ItemState::new(ObjectId(7), "Fuse");
        store.note_item(fuse.id, &fuse.name);
        assert!(store.needs_part(PANEL, &fuse));

        store.add_part(PANEL, fuse.id);

        assert!(!store.needs_part(PANEL, &fuse));
        assert_eq!(store.installed_parts(PANEL), &[fuse.id]);
    }

    #[test]
    fn membership_moves_between_containers() {
        let mut store = store();
        store.add(ContainerSpec::new(ObjectId(200), "Crate")).unwrap();

        store.sync_member(ObjectId(7), Some(PANEL), (1, 2));
        assert_eq!(store.occupied_cells(PANEL), 2);

        store.sync_member(ObjectId(7), Some(ObjectId(200)), (1, 2));
        assert!(store.contents(PANEL).is_empty());
        assert_eq!(store.contents(ObjectId(200)), vec![ObjectId(7)]);

        store.remove_by_id(ObjectId(200), ObjectId(7), (1, 2));
        assert!(store.contents(ObjectId(200)).is_empty());
    }

    #[test]
    fn duplicate_container_is_rejected() {
        let mut store = store();
        assert!(matches!(
            store.add(ContainerSpec::new(PANEL, "Again")),
            Err(SessionError::DuplicateContainer(_))
        ));
    }
}
