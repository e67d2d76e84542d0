//! Local form checks applied before any remote call.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum thread title length, in characters after trimming.
pub const MAX_TITLE_CHARS: usize = 100;
/// Maximum post content length, in characters after trimming.
pub const MAX_CONTENT_CHARS: usize = 500;
/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    Title,
    Content,
}

impl Field {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "email address",
            Self::Password => "password",
            Self::Title => "thread title",
            Self::Content => "post content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter the {field}.")]
    Required { field: Field },
    #[error("The {field} must be at most {max} characters.")]
    TooLong { field: Field, max: usize },
    #[error("The {field} must be at least {min} characters.")]
    TooShort { field: Field, min: usize },
    #[error("The {field} is not in a valid format.")]
    Malformed { field: Field },
}

impl ValidationError {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::TooShort { field, .. }
            | Self::Malformed { field } => *field,
        }
    }
}

fn bounded_text(raw: &str, field: Field, max: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Trimmed, non-empty thread title of at most [`MAX_TITLE_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTitle(String);

impl ThreadTitle {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        bounded_text(raw, Field::Title, MAX_TITLE_CHARS).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed, non-empty post body of at most [`MAX_CONTENT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        bounded_text(raw, Field::Content, MAX_CONTENT_CHARS).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Email address with a plausible `local@domain.tld` shape. Sent as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::Required {
                field: Field::Email,
            });
        }
        if !EMAIL_SHAPE.is_match(raw) {
            return Err(ValidationError::Malformed {
                field: Field::Email,
            });
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsPurpose {
    Register,
    Login,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn parse(raw: &str, purpose: CredentialsPurpose) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::Required {
                field: Field::Password,
            });
        }
        if purpose == CredentialsPurpose::Register && raw.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::TooShort {
                field: Field::Password,
                min: MIN_PASSWORD_CHARS,
            });
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

impl Credentials {
    /// Check both fields, reporting every failure rather than stopping at the first.
    pub fn parse(
        email: &str,
        password: &str,
        purpose: CredentialsPurpose,
    ) -> Result<Self, Vec<ValidationError>> {
        match (Email::parse(email), Password::parse(password, purpose)) {
            (Ok(email), Ok(password)) => Ok(Self { email, password }),
            (email, password) => Err([email.err(), password.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}
