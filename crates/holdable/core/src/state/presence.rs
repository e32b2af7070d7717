bitflags::bitflags! {
    /// Which parts of an item are active in the world.
    ///
    /// Collaborators (physics, rendering, animation, hand IK) read these flags;
    /// the ownership transitions are the only writers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Presence: u8 {
        const COLLIDERS = 1 << 0;
        const RENDERERS = 1 << 1;
        const ANIMATION = 1 << 2;
        /// Holder's hand IK targets are bound to the item's grip points.
        const HANDS_BOUND = 1 << 3;
    }
}

impl Presence {
    /// Freshly spawned item lying in the world.
    pub const WORLD: Self = Self::COLLIDERS.union(Self::RENDERERS);
}

impl Default for Presence {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Render layer of an item. Items in the local hands draw over everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderLayer {
    #[default]
    World,
    Hands,
}
