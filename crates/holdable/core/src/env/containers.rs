use crate::state::{ItemState, ObjectId};

/// Container as seen from an item looking for an install target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: ObjectId,
    /// Display name of the object carrying the container.
    pub name: String,
}

/// Registry of every object carrying a container capability.
pub trait ContainerRegistry {
    /// Returns true if a container with this id exists in the session.
    fn contains(&self, container: ObjectId) -> bool;

    /// Finds the container carried by `object` itself or by its nearest
    /// ancestor.
    fn resolve(&self, object: ObjectId) -> Option<ContainerInfo>;

    /// Does the container still need this exact item as a part?
    fn needs_part(&self, container: ObjectId, item: &ItemState) -> bool;

    /// Installs the item as one of the container's parts.
    fn add_part(&mut self, container: ObjectId, item: ObjectId);

    /// Frees the grid cells the item occupied. Unknown ids are ignored.
    fn remove_by_id(&mut self, container: ObjectId, item: ObjectId, size: (u32, u32));
}
