use std::fmt;

/// Broad failure categories shared by every layer of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No API base URL was configured; no call was attempted.
    ConfigurationMissing,
    /// The network call itself did not complete.
    TransportFailure,
    /// The call completed but the body did not have the expected shape.
    MalformedResponse,
    /// The server answered with a failure status and an error code.
    ApplicationError,
    /// A form field failed local checks before any call was made.
    LocalValidationFailure,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::TransportFailure => "transport_failure",
            Self::MalformedResponse => "malformed_response",
            Self::ApplicationError => "application_error",
            Self::LocalValidationFailure => "local_validation_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-supplied `error_code`, kept verbatim for anything unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingCredentials,
    InvalidCredentials,
    InvalidEmailFormat,
    PasswordTooShort,
    EmailAlreadyExists,
    DbError,
    MethodNotAllowed,
    UnknownAppError,
    ThreadNotFound,
    UserNotFound,
    /// Any other code. Empty when the server sent none.
    Unrecognized(String),
}

impl ErrorCode {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unrecognized(String::new());
        };
        match raw.trim() {
            "MISSING_CREDENTIALS" => Self::MissingCredentials,
            "INVALID_CREDENTIALS" => Self::InvalidCredentials,
            "INVALID_EMAIL_FORMAT" => Self::InvalidEmailFormat,
            "PASSWORD_TOO_SHORT" => Self::PasswordTooShort,
            "EMAIL_ALREADY_EXISTS" => Self::EmailAlreadyExists,
            "DB_ERROR" => Self::DbError,
            "METHOD_NOT_ALLOWED" => Self::MethodNotAllowed,
            "UNKNOWN_APP_ERROR" => Self::UnknownAppError,
            "THREAD_NOT_FOUND" => Self::ThreadNotFound,
            "USER_NOT_FOUND" => Self::UserNotFound,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::DbError => "DB_ERROR",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::UnknownAppError => "UNKNOWN_APP_ERROR",
            Self::ThreadNotFound => "THREAD_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Unrecognized(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) if raw.is_empty() => f.write_str("UNRECOGNIZED"),
            other => f.write_str(other.as_str()),
        }
    }
}
