//! User-facing text for every failure and success the controller reports.
//!
//! One table serves every view, keyed by operation and server error code.

use board_client::{Operation, RemoteError};
use board_types::{ErrorCode, Field, MIN_PASSWORD_CHARS, ValidationError};

pub trait MessageCatalog {
    /// Text for a server-reported failure.
    fn application_error(
        &self,
        operation: Operation,
        code: &ErrorCode,
        server_message: Option<&str>,
        status: u16,
    ) -> String;

    /// Generic retry-suggesting text for transport and malformed-response failures.
    fn unavailable(&self, operation: Operation) -> String;

    fn configuration_missing(&self) -> String;

    fn success(&self, operation: Operation, server_message: Option<&str>) -> String;

    fn validation(&self, error: &ValidationError) -> String {
        error.to_string()
    }

    fn describe(&self, error: &RemoteError) -> String {
        match error {
            RemoteError::ConfigurationMissing => self.configuration_missing(),
            RemoteError::Transport { operation, .. }
            | RemoteError::MalformedResponse { operation, .. } => self.unavailable(*operation),
            RemoteError::Application {
                operation,
                status,
                code,
                message,
            } => self.application_error(*operation, code, message.as_deref(), *status),
        }
    }
}

/// Form field a server error code refers to, if any.
#[must_use]
pub fn field_of(code: &ErrorCode) -> Option<Field> {
    match code {
        ErrorCode::InvalidEmailFormat | ErrorCode::EmailAlreadyExists => Some(Field::Email),
        ErrorCode::PasswordTooShort => Some(Field::Password),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl EnglishCatalog {
    fn action(operation: Operation) -> &'static str {
        match operation {
            Operation::Register => "register",
            Operation::Login => "sign in",
            Operation::ListThreads => "load threads",
            Operation::CreateThread => "create the thread",
            Operation::ListThreadPosts => "load posts",
            Operation::CreatePost => "post the reply",
            Operation::IdentityDetails => "load account details",
        }
    }
}

impl MessageCatalog for EnglishCatalog {
    fn application_error(
        &self,
        operation: Operation,
        code: &ErrorCode,
        server_message: Option<&str>,
        status: u16,
    ) -> String {
        use ErrorCode as C;
        use Operation as Op;

        let fixed = match (operation, code) {
            (Op::Register, C::InvalidEmailFormat) => "The email address is not in a valid format.",
            (Op::Register, C::PasswordTooShort) => {
                return format!(
                    "The password must be at least {MIN_PASSWORD_CHARS} characters."
                );
            }
            (Op::Register, C::EmailAlreadyExists) => "This email address is already registered.",
            (Op::Register, C::DbError) => "A database error occurred. Please try again later.",
            (Op::Login, C::MissingCredentials) => "Please enter your email address and password.",
            (Op::Login, C::InvalidCredentials) => "The email address or password is incorrect.",
            (Op::Login, C::DbError) => {
                return format!(
                    "A database error occurred ({}). Please try again later.",
                    server_message.unwrap_or("no details")
                );
            }
            (Op::Register | Op::Login, C::MethodNotAllowed) => "The request was not accepted.",
            (Op::Register | Op::Login, C::UnknownAppError) => {
                let verb = if operation == Op::Register {
                    "registering"
                } else {
                    "signing in"
                };
                return format!(
                    "An unexpected error occurred while {verb}: {}",
                    server_message.unwrap_or("no details")
                );
            }
            (Op::ListThreadPosts | Op::CreatePost, C::ThreadNotFound) => {
                "This thread does not exist."
            }
            (Op::IdentityDetails, C::UserNotFound) => "No account was found for this identity.",
            _ => {
                return match server_message {
                    Some(message) => message.to_string(),
                    None if matches!(operation, Op::Register | Op::Login) => {
                        format!("An unknown error occurred (HTTP {status}).")
                    }
                    None => format!("Could not {}.", Self::action(operation)),
                };
            }
        };
        fixed.to_string()
    }

    fn unavailable(&self, operation: Operation) -> String {
        format!(
            "Could not {}: the board did not respond properly. Please try again.",
            Self::action(operation)
        )
    }

    fn configuration_missing(&self) -> String {
        "The board API address is not configured. Set ANONBOARD_API_URL or [api] base_url."
            .to_string()
    }

    fn success(&self, operation: Operation, server_message: Option<&str>) -> String {
        if let Some(message) = server_message.filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
        match operation {
            Operation::Register => "Registration complete.",
            Operation::Login => "Signed in.",
            Operation::CreateThread => "Thread created.",
            Operation::CreatePost => "Reply posted.",
            Operation::ListThreads | Operation::ListThreadPosts | Operation::IdentityDetails => {
                "Done."
            }
        }
        .to_string()
    }
}
