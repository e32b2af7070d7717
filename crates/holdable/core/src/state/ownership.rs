//! Where an item lives and who may change that.

use super::{ObjectId, PeerId};

/// Location of an item. Exactly one holds at a time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OwnershipState {
    /// Free physics body in the world.
    #[default]
    Free,
    /// Held by a player (local or remote, see [`Attachment`]).
    InHands,
    /// Stored inside exactly one container.
    InContainer,
    /// Detached from the local hands and following the placement raycast.
    PrecisionPlacing,
}

/// Which process is the source of truth for an item's pose and ownership.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Authority {
    /// This process originates changes and must publish them.
    #[default]
    Local,
    /// This process mirrors a remote authority's broadcasts.
    Network,
}

/// What the item is parented to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attachment {
    #[default]
    Detached,
    LocalHand,
    RemoteHand(PeerId),
}

/// Ownership record of a single item.
///
/// Fields are read freely; mutation goes through the crate-internal helpers
/// below so the record can never hold two locations at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ownership {
    state: OwnershipState,
    authority: Authority,
    attachment: Attachment,
    container: Option<ObjectId>,
}

impl Ownership {
    /// Free item owned by this process.
    pub const fn local() -> Self {
        Self {
            state: OwnershipState::Free,
            authority: Authority::Local,
            attachment: Attachment::Detached,
            container: None,
        }
    }

    /// Free item mirrored from a remote authority.
    pub const fn replica() -> Self {
        Self {
            authority: Authority::Network,
            ..Self::local()
        }
    }

    pub const fn state(&self) -> OwnershipState {
        self.state
    }

    pub const fn authority(&self) -> Authority {
        self.authority
    }

    pub const fn attachment(&self) -> Attachment {
        self.attachment
    }

    /// Container the item is stored in, if any.
    pub const fn container(&self) -> Option<ObjectId> {
        self.container
    }

    pub const fn is_in_hands(&self) -> bool {
        matches!(
            self.state,
            OwnershipState::InHands | OwnershipState::PrecisionPlacing
        )
    }

    pub const fn is_held_locally(&self) -> bool {
        self.is_in_hands() && matches!(self.attachment, Attachment::LocalHand)
    }

    pub const fn is_held_remotely(&self) -> bool {
        matches!(self.attachment, Attachment::RemoteHand(_))
    }

    pub const fn is_placing(&self) -> bool {
        matches!(self.state, OwnershipState::PrecisionPlacing)
    }

    /// Checks the structural invariants of the record.
    ///
    /// - container link is set iff the item is in a container
    /// - the item is attached to a hand iff it is in hands or placing
    /// - precision placement only happens from the local hands
    pub fn is_consistent(&self) -> bool {
        let container_ok = self.container.is_some() == (self.state == OwnershipState::InContainer);
        let attachment_ok = match self.attachment {
            Attachment::Detached => !self.is_in_hands(),
            Attachment::LocalHand => self.is_in_hands(),
            Attachment::RemoteHand(_) => self.state == OwnershipState::InHands,
        };
        container_ok && attachment_ok
    }

    pub(crate) fn enter_hands(&mut self, attachment: Attachment, authority: Authority) {
        debug_assert!(!matches!(attachment, Attachment::Detached));
        self.state = OwnershipState::InHands;
        self.attachment = attachment;
        self.container = None;
        self.authority = authority;
    }

    pub(crate) fn enter_container(&mut self, container: ObjectId, authority: Authority) {
        self.state = OwnershipState::InContainer;
        self.attachment = Attachment::Detached;
        self.container = Some(container);
        self.authority = authority;
    }

    pub(crate) fn release(&mut self, authority: Authority) {
        self.state = OwnershipState::Free;
        self.attachment = Attachment::Detached;
        self.container = None;
        self.authority = authority;
    }

    pub(crate) fn begin_placing(&mut self) {
        debug_assert!(self.is_held_locally());
        self.state = OwnershipState::PrecisionPlacing;
    }

    pub(crate) fn end_placing(&mut self) {
        debug_assert!(self.is_placing());
        self.state = OwnershipState::InHands;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_records_are_consistent() {
        assert!(Ownership::local().is_consistent());
        assert!(Ownership::replica().is_consistent());
        assert_eq!(Ownership::replica().authority(), Authority::Network);
    }

    #[test]
    fn entering_hands_clears_container_link() {
        let mut ownership = Ownership::local();
        ownership.enter_container(ObjectId(7), Authority::Local);
        assert_eq!(ownership.container(), Some(ObjectId(7)));

        ownership.enter_hands(Attachment::LocalHand, Authority::Local);

        assert_eq!(ownership.state(), OwnershipState::InHands);
        assert_eq!(ownership.container(), None);
        assert!(ownership.is_consistent());
    }

    #[test]
    fn remote_hands_cannot_be_placing() {
        let mut ownership = Ownership::local();
        ownership.enter_hands(Attachment::RemoteHand(PeerId(3)), Authority::Network);
        assert!(ownership.is_consistent());
        assert!(ownership.is_held_remotely());
        assert!(!ownership.is_held_locally());
    }
}
