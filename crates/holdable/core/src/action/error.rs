//! Action execution errors.

use crate::error::{ErrorSeverity, HoldableError};

use super::UseSlot;

/// Why a use input did nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The item is not in the local hands.
    #[error("item is not held locally")]
    NotHeld,

    /// The list for the requested slot is empty.
    #[error("no {0} actions offered")]
    NoActionsOffered(UseSlot),

    /// Another action is already in progress.
    #[error("{active} action already in progress")]
    Busy { active: UseSlot },

    /// End requested for a slot that has no active action.
    #[error("no active {0} action")]
    NotActive(UseSlot),
}

impl HoldableError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            NotHeld => "ACTION_NOT_HELD",
            NoActionsOffered(_) => "ACTION_NONE_OFFERED",
            Busy { .. } => "ACTION_BUSY",
            NotActive(_) => "ACTION_NOT_ACTIVE",
        }
    }
}
