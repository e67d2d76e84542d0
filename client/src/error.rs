use board_types::{ErrorCode, ErrorKind};
use thiserror::Error;

use crate::Operation;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Classified outcome of a failed remote call.
///
/// Only [`RemoteError::Application`] carries text meant for the user; the other
/// variants hold diagnostic detail for the log.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("API base URL is not configured")]
    ConfigurationMissing,

    #[error("{operation} request failed: {detail}")]
    Transport { operation: Operation, detail: String },

    #[error("{operation} returned an unusable response (HTTP {status}): {reason}")]
    MalformedResponse {
        operation: Operation,
        status: u16,
        reason: String,
        /// Response body, capped for logging.
        body: String,
    },

    #[error("{operation} failed with {code} (HTTP {status})")]
    Application {
        operation: Operation,
        status: u16,
        code: ErrorCode,
        message: Option<String>,
    },
}

impl RemoteError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing => ErrorKind::ConfigurationMissing,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Application { .. } => ErrorKind::ApplicationError,
        }
    }

    #[must_use]
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Application { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Server-supplied message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MalformedResponse { status, .. } | Self::Application { status, .. } => {
                Some(*status)
            }
            Self::ConfigurationMissing | Self::Transport { .. } => None,
        }
    }
}
