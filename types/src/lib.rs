//! Core domain types for the anonymous board client.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod board;
mod error;
mod identity;
mod ids;
mod validation;

pub use board::{
    AuthorId, CreatedAt, IdentityDetails, Post, Registration, Thread, ThreadHeader, ThreadPosts,
    sort_newest_first,
};
pub use error::{ErrorCode, ErrorKind};
pub use identity::{Identity, SessionState};
pub use ids::{PostId, ThreadId, WireNumber};
pub use validation::{
    Credentials, CredentialsPurpose, Email, Field, MAX_CONTENT_CHARS, MAX_TITLE_CHARS,
    MIN_PASSWORD_CHARS, Password, PostContent, ThreadTitle, ValidationError,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Shorten an opaque id for display: first 8 characters followed by `...`.
#[must_use]
pub fn abbreviate(raw: &str) -> String {
    let head: String = raw.chars().take(8).collect();
    format!("{head}...")
}
