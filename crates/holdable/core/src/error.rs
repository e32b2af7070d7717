//! Common error infrastructure for holdable-core.
//!
//! This module provides shared types and traits used across all error types in
//! the crate. Domain-specific errors (`TransitionError`, `ProtocolError`,
//! `ActionError`) live next to the operations that produce them.
//!
//! None of these errors is fatal to a session: a rejected transition changes
//! nothing and emits nothing, a malformed frame is dropped on its own, and a
//! missing collaborator entity skips only the dependent step.

use crate::state::{ObjectId, OwnershipState};

/// Severity level of an error, used for categorization and logging priority.
///
/// - **Recoverable**: the request was valid in general but not right now
///   (item already held, action slot busy)
/// - **Validation**: the request or frame itself was wrong (bad field count,
///   unknown container id)
/// - **Internal**: an invariant that should hold did not; investigate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Request is fine in principle but the current state rejects it.
    Recoverable,

    /// Input is invalid and should not be retried unchanged.
    Validation,

    /// Unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    /// Lowercase label used in log fields.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Whether retrying later, after the state changes, can succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Whether the error points at a broken invariant.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    /// Item the failing operation targeted.
    pub item: ObjectId,

    /// Ownership state at the time of the failure.
    pub state: OwnershipState,

    /// Extra detail for the log line.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new context for the given item and state.
    #[must_use]
    pub const fn new(item: ObjectId, state: OwnershipState) -> Self {
        Self {
            item,
            state,
            message: None,
        }
    }

    /// Adds a detail message.
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all holdable-core errors.
///
/// Implementors derive `thiserror::Error`. Codes are SCREAMING_SNAKE_CASE and
/// stay stable so logs can be filtered on them.
pub trait HoldableError: core::fmt::Display + core::fmt::Debug {
    /// How callers should treat the failure.
    fn severity(&self) -> ErrorSeverity;

    /// Item and ownership state at the point of failure, when known.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for the variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
