//! Frame decoding errors.

use crate::error::{ErrorSeverity, HoldableError};

use super::Opcode;

/// A frame that cannot be applied. Fatal to that frame only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame does not start with the item routing tag (found {found:?})")]
    MissingRoutingTag { found: String },

    #[error("frame has no opcode")]
    MissingOpcode,

    #[error("unknown opcode {0:?}")]
    UnknownOpcode(String),

    #[error("{opcode} expects {expected} fields, found {found}")]
    FieldCount {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    #[error("field {index} is not a finite float: {value:?}")]
    InvalidFloat { index: usize, value: String },

    #[error("field {index} is not True/False: {value:?}")]
    InvalidBool { index: usize, value: String },

    #[error("invalid container id {0:?}")]
    InvalidContainerId(String),

    #[error("animation name {0:?} is empty or contains the field delimiter")]
    InvalidAnimName(String),
}

impl HoldableError for ProtocolError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ProtocolError::*;
        match self {
            MissingRoutingTag { .. } => "PROTOCOL_MISSING_ROUTING_TAG",
            MissingOpcode => "PROTOCOL_MISSING_OPCODE",
            UnknownOpcode(_) => "PROTOCOL_UNKNOWN_OPCODE",
            FieldCount { .. } => "PROTOCOL_FIELD_COUNT",
            InvalidFloat { .. } => "PROTOCOL_INVALID_FLOAT",
            InvalidBool { .. } => "PROTOCOL_INVALID_BOOL",
            InvalidContainerId(_) => "PROTOCOL_INVALID_CONTAINER_ID",
            InvalidAnimName(_) => "PROTOCOL_INVALID_ANIM_NAME",
        }
    }
}
