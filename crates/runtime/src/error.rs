//! Errors surfaced by the session layer.
//!
//! Item-level rejections are wrapped so callers can bubble them up with the
//! item id attached; none of them stop a session.
use std::path::PathBuf;

use thiserror::Error;

use holdable_core::{ActionError, ApplyError, HoldableError, ObjectId, TransitionError};

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("item {0} is not registered in this session")]
    UnknownItem(ObjectId),

    #[error("item {0} is already registered")]
    DuplicateItem(ObjectId),

    #[error("container {0} is already registered")]
    DuplicateContainer(ObjectId),

    #[error("transition on item {item} rejected")]
    Transition {
        item: ObjectId,
        #[source]
        source: TransitionError,
    },

    #[error("action on item {item} rejected")]
    Action {
        item: ObjectId,
        #[source]
        source: ActionError,
    },

    #[error("frame for item {item} skipped")]
    Apply {
        item: ObjectId,
        #[source]
        source: ApplyError,
    },

    #[error("network channel closed")]
    ChannelClosed,

    #[error("session driver join failed")]
    DriverJoin(#[source] tokio::task::JoinError),

    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl SessionError {
    /// Stable code for logs. Item-level errors forward the core code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "SESSION_UNKNOWN_ITEM",
            Self::DuplicateItem(_) => "SESSION_DUPLICATE_ITEM",
            Self::DuplicateContainer(_) => "SESSION_DUPLICATE_CONTAINER",
            Self::Transition { source, .. } => source.error_code(),
            Self::Action { source, .. } => source.error_code(),
            Self::Apply { source, .. } => source.error_code(),
            Self::ChannelClosed => "SESSION_CHANNEL_CLOSED",
            Self::DriverJoin(_) => "SESSION_DRIVER_JOIN",
            Self::ConfigRead { .. } => "SESSION_CONFIG_READ",
            Self::ConfigParse { .. } => "SESSION_CONFIG_PARSE",
        }
    }
}
