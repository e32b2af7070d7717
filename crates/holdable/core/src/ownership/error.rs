//! Ownership transition errors.
//!
//! A rejected transition changes nothing and emits nothing. Callers log these
//! at debug level; none is surfaced to the player.

use crate::error::{ErrorContext, ErrorSeverity, HoldableError};
use crate::protocol::ProtocolError;
use crate::state::{ObjectId, OwnershipState, PeerId};

// ============================================================================
// Transition Kind
// ============================================================================

/// Locally requested ownership transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransitionKind {
    PickUp,
    Drop,
    StoreIn,
    RemoveFromContainer,
    StartPrecisionPlace,
    CancelPrecisionPlace,
    CommitPrecisionPlace,
    TakeFromHands,
}

impl TransitionKind {
    /// Claim transitions may take an item away from network authority.
    /// Exclusive ones require this process to already be the authority.
    pub const fn is_claim(self) -> bool {
        matches!(
            self,
            Self::PickUp | Self::StoreIn | Self::RemoveFromContainer
        )
    }
}

// ============================================================================
// Transition Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The ownership state does not allow this transition.
    #[error("cannot {kind} while {}", .context.state)]
    InvalidState {
        kind: TransitionKind,
        context: ErrorContext,
    },

    /// A remote peer is holding the item.
    #[error("cannot {kind}: held by {peer}")]
    RemotelyHeld {
        kind: TransitionKind,
        peer: PeerId,
        context: ErrorContext,
    },

    /// The item mirrors a remote authority.
    #[error("cannot {kind}: item is under network authority")]
    NotAuthoritative {
        kind: TransitionKind,
        context: ErrorContext,
    },

    /// Pick-up disabled on this item.
    #[error("item cannot be picked up")]
    NotPickable { context: ErrorContext },

    /// Target container is the one the item is already in.
    #[error("already stored in {container}")]
    AlreadyInContainer {
        container: ObjectId,
        context: ErrorContext,
    },

    /// Target container does not exist in the session.
    #[error("container {container} not found")]
    UnknownContainer {
        container: ObjectId,
        context: ErrorContext,
    },
}

impl TransitionError {
    pub fn invalid_state(kind: TransitionKind, item: ObjectId, state: OwnershipState) -> Self {
        Self::InvalidState {
            kind,
            context: ErrorContext::new(item, state),
        }
    }

    pub fn remotely_held(
        kind: TransitionKind,
        peer: PeerId,
        item: ObjectId,
        state: OwnershipState,
    ) -> Self {
        Self::RemotelyHeld {
            kind,
            peer,
            context: ErrorContext::new(item, state).with_message("claim refused while held"),
        }
    }

    pub fn not_authoritative(kind: TransitionKind, item: ObjectId, state: OwnershipState) -> Self {
        Self::NotAuthoritative {
            kind,
            context: ErrorContext::new(item, state)
                .with_message("exclusive transition requires local authority"),
        }
    }

    pub fn not_pickable(item: ObjectId, state: OwnershipState) -> Self {
        Self::NotPickable {
            context: ErrorContext::new(item, state),
        }
    }

    pub fn already_in_container(container: ObjectId, item: ObjectId) -> Self {
        Self::AlreadyInContainer {
            container,
            context: ErrorContext::new(item, OwnershipState::InContainer),
        }
    }

    pub fn unknown_container(container: ObjectId, item: ObjectId, state: OwnershipState) -> Self {
        Self::UnknownContainer {
            container,
            context: ErrorContext::new(item, state).with_message("container lookup failed"),
        }
    }
}

impl HoldableError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidState { .. }
            | Self::RemotelyHeld { .. }
            | Self::NotPickable { .. }
            | Self::AlreadyInContainer { .. } => ErrorSeverity::Recoverable,
            Self::NotAuthoritative { .. } | Self::UnknownContainer { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvalidState { context, .. }
            | Self::RemotelyHeld { context, .. }
            | Self::NotAuthoritative { context, .. }
            | Self::NotPickable { context }
            | Self::AlreadyInContainer { context, .. }
            | Self::UnknownContainer { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "TRANSITION_INVALID_STATE",
            Self::RemotelyHeld { .. } => "TRANSITION_REMOTELY_HELD",
            Self::NotAuthoritative { .. } => "TRANSITION_NOT_AUTHORITATIVE",
            Self::NotPickable { .. } => "TRANSITION_NOT_PICKABLE",
            Self::AlreadyInContainer { .. } => "TRANSITION_ALREADY_IN_CONTAINER",
            Self::UnknownContainer { .. } => "TRANSITION_UNKNOWN_CONTAINER",
        }
    }
}

// ============================================================================
// Network Apply Errors
// ============================================================================

/// An incoming frame that was skipped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The frame names a container this session does not know.
    #[error("item {item}: container {container} not found")]
    MissingContainer { item: ObjectId, container: ObjectId },
}

impl HoldableError for ApplyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(inner) => inner.error_code(),
            Self::MissingContainer { .. } => "APPLY_MISSING_CONTAINER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_item_context() {
        let err = TransitionError::not_authoritative(
            TransitionKind::Drop,
            ObjectId(3),
            OwnershipState::InHands,
        );
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "TRANSITION_NOT_AUTHORITATIVE");
        let context = err.context().unwrap();
        assert_eq!(context.item, ObjectId(3));
        assert_eq!(context.state, OwnershipState::InHands);
    }

    #[test]
    fn display_names_transition_and_state() {
        let err =
            TransitionError::invalid_state(TransitionKind::PickUp, ObjectId(1), OwnershipState::InHands);
        assert_eq!(err.to_string(), "cannot pick_up while in_hands");
    }

    #[test]
    fn apply_error_forwards_protocol_code() {
        let err = ApplyError::from(ProtocolError::MissingOpcode);
        assert_eq!(err.error_code(), "PROTOCOL_MISSING_OPCODE");
    }
}
