use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EmptyStringError, NonEmptyString, abbreviate};

/// Opaque pseudonymous identity token issued by the board on registration or login.
///
/// The client never inspects the token beyond requiring it to be non-blank.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(NonEmptyString);

impl Identity {
    pub fn new(token: impl Into<String>) -> Result<Self, EmptyStringError> {
        NonEmptyString::new(token).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0.into_inner()
    }

    #[must_use]
    pub fn abbreviated(&self) -> String {
        abbreviate(self.as_str())
    }
}

// Manual Debug impl to keep tokens out of logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.abbreviated())
    }
}

/// Snapshot of the identity session.
///
/// `resolving` is true only before the durable slot has been read once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub resolving: bool,
}

impl SessionState {
    #[must_use]
    pub const fn resolving() -> Self {
        Self {
            identity: None,
            resolving: true,
        }
    }

    #[must_use]
    pub const fn resolved(identity: Option<Identity>) -> Self {
        Self {
            identity,
            resolving: false,
        }
    }
}
