//! Request and response bodies of the board API.
//!
//! Every response is a JSON object with a `status` of `"success"` or `"error"`,
//! an optional human-readable `message`, an optional `error_code`, and the
//! operation's payload fields alongside them.

use std::borrow::Cow;
use std::sync::LazyLock;

use board_types::{ErrorCode, IdentityDetails, Post, Thread, ThreadHeader, WireNumber};
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{MAX_DIAGNOSTIC_BODY_BYTES, Operation, RemoteError, RemoteResult};

const STATUS_SUCCESS: &str = "success";
const REDACTED: &str = "<redacted>";

/// A `randomUserId` / `random_user_id` member and its value, whatever its JSON type.
static IDENTITY_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"("(?:randomUserId|random_user_id)"\s*:\s*)"#,
        r#"("(?:[^"\\]|\\.)*"|\[[^\]]*\]|\{[^}]*\}|[^,}\]\s]+)"#,
    ))
    .expect("identity member pattern is valid")
});

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// Classify a completed exchange.
///
/// An unparseable body is malformed regardless of HTTP status. A parsed body
/// is an application error unless both the HTTP status and the envelope
/// status report success.
pub(crate) fn classify<T: DeserializeOwned>(
    operation: Operation,
    status: StatusCode,
    body: &str,
) -> RemoteResult<Envelope<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| malformed(operation, status, body, parse_failure(&e)))?;

    if status.is_success() && envelope.status == STATUS_SUCCESS {
        return Ok(envelope);
    }

    let code = ErrorCode::parse(envelope.error_code.as_deref());
    if !code.is_recognized() {
        tracing::warn!(
            operation = %operation,
            status = status.as_u16(),
            error_code = %code,
            "Unrecognized application error"
        );
    }
    Err(RemoteError::Application {
        operation,
        status: status.as_u16(),
        code,
        message: envelope.message.filter(|m| !m.trim().is_empty()),
    })
}

/// Build a [`RemoteError::MalformedResponse`] and log it with the offending body.
///
/// Identity tokens in the body are redacted before it is logged or kept.
pub(crate) fn malformed(
    operation: Operation,
    status: StatusCode,
    body: &str,
    reason: String,
) -> RemoteError {
    let body = cap_for_diagnostics(&redact_identity_tokens(body));
    tracing::error!(
        operation = %operation,
        status = status.as_u16(),
        body = %body,
        "Malformed response: {reason}"
    );
    RemoteError::MalformedResponse {
        operation,
        status: status.as_u16(),
        reason,
        body,
    }
}

/// Describe a parse failure by position only; serde_json quotes offending values.
fn parse_failure(err: &serde_json::Error) -> String {
    format!(
        "invalid body ({:?} error at line {} column {})",
        err.classify(),
        err.line(),
        err.column()
    )
}

fn redact_identity_tokens(body: &str) -> Cow<'_, str> {
    IDENTITY_MEMBER.replace_all(body, format!("${{1}}\"{REDACTED}\""))
}

fn cap_for_diagnostics(body: &str) -> String {
    if body.len() <= MAX_DIAGNOSTIC_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_DIAGNOSTIC_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &body[..end])
}

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Serialize)]
pub(crate) struct CredentialsBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewThreadBody<'a> {
    pub random_user_id: &'a str,
    pub title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewPostBody<'a> {
    pub random_user_id: &'a str,
    pub thread_id: u64,
    pub content: &'a str,
}

// ----------------------------------------------------------------------------
// Response payloads
// ----------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IssuedIdentity {
    #[serde(rename = "randomUserId", default)]
    pub random_user_id: Option<String>,
    #[serde(default)]
    pub id: Option<WireNumber>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThreadList {
    #[serde(default)]
    pub threads: Option<Vec<Thread>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreatedThread {
    #[serde(rename = "threadId", default)]
    pub thread_id: Option<WireNumber>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PostList {
    #[serde(default)]
    pub thread: Option<ThreadHeader>,
    #[serde(default)]
    pub posts: Option<Vec<Post>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AccountDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "registeredAt", default)]
    pub registered_at: Option<String>,
}

impl From<AccountDetails> for IdentityDetails {
    fn from(raw: AccountDetails) -> Self {
        Self {
            email: raw.email.filter(|e| !e.trim().is_empty()),
            registered_at: raw
                .registered_at
                .filter(|t| !t.trim().is_empty())
                .map(board_types::CreatedAt::new),
        }
    }
}

/// Payload-free acknowledgement.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Empty {}

#[cfg(test)]
mod tests {
    use board_types::ErrorCode;
    use reqwest::StatusCode;

    use super::{
        Empty, IssuedIdentity, ThreadList, cap_for_diagnostics, classify, redact_identity_tokens,
    };
    use crate::{MAX_DIAGNOSTIC_BODY_BYTES, Operation, RemoteError};

    #[test]
    fn success_envelope_passes_through() {
        let body = r#"{"status":"success","message":"ok","randomUserId":"U1","id":7}"#;
        let env = classify::<IssuedIdentity>(Operation::Register, StatusCode::OK, body).unwrap();
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.payload.random_user_id.as_deref(), Some("U1"));
    }

    #[test]
    fn error_status_in_body_is_an_application_error() {
        let body = r#"{"status":"error","message":"taken","error_code":"EMAIL_ALREADY_EXISTS"}"#;
        let err =
            classify::<IssuedIdentity>(Operation::Register, StatusCode::OK, body).unwrap_err();
        match err {
            RemoteError::Application {
                code,
                message,
                status,
                ..
            } => {
                assert_eq!(code, ErrorCode::EmailAlreadyExists);
                assert_eq!(message.as_deref(), Some("taken"));
                assert_eq!(status, 200);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_2xx_with_success_body_is_still_an_error() {
        let body = r#"{"status":"success"}"#;
        let err = classify::<Empty>(Operation::CreatePost, StatusCode::INTERNAL_SERVER_ERROR, body)
            .unwrap_err();
        assert!(matches!(err, RemoteError::Application { status: 500, .. }));
    }

    #[test]
    fn unparseable_body_is_malformed_even_on_error_status() {
        let err = classify::<ThreadList>(
            Operation::ListThreads,
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::MalformedResponse { status: 502, .. }
        ));
    }

    #[test]
    fn missing_status_field_is_malformed() {
        let body = r#"{"threads":[]}"#;
        let err = classify::<ThreadList>(Operation::ListThreads, StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, RemoteError::MalformedResponse { .. }));
    }

    #[test]
    fn blank_server_message_is_dropped() {
        let body = r#"{"status":"error","message":"  ","error_code":"DB_ERROR"}"#;
        let err = classify::<Empty>(Operation::CreateThread, StatusCode::OK, body).unwrap_err();
        assert_eq!(err.server_message(), None);
        assert_eq!(err.code(), Some(&ErrorCode::DbError));
    }

    #[test]
    fn diagnostic_body_is_capped_on_a_char_boundary() {
        let body = "é".repeat(MAX_DIAGNOSTIC_BODY_BYTES);
        let capped = cap_for_diagnostics(&body);
        assert!(capped.ends_with("...(truncated)"));
        assert!(capped.len() <= MAX_DIAGNOSTIC_BODY_BYTES + "...(truncated)".len());
    }

    #[test]
    fn identity_tokens_are_redacted_whatever_their_type() {
        let body = concat!(
            r#"{"randomUserId":"SECRET-A","#,
            r#""x":{"random_user_id": 12345},"#,
            r#""randomUserId":["SECRET-B"]}"#,
        );
        let redacted = redact_identity_tokens(body);
        assert!(!redacted.contains("SECRET"));
        assert!(!redacted.contains("12345"));
        assert_eq!(redacted.matches("<redacted>").count(), 3);
    }

    #[test]
    fn bodies_without_tokens_are_left_alone() {
        let body = r#"{"status":"error","message":"nope"}"#;
        assert_eq!(redact_identity_tokens(body), body);
    }

    #[test]
    fn malformed_issued_identity_keeps_no_token() {
        let body = r#"{"status":"success","randomUserId":{"value":"SECRET-TOKEN-42"}}"#;
        let err = classify::<IssuedIdentity>(Operation::Login, StatusCode::OK, body).unwrap_err();
        match err {
            RemoteError::MalformedResponse { body, reason, .. } => {
                assert!(body.contains("<redacted>"));
                assert!(!body.contains("SECRET-TOKEN-42"));
                assert!(!reason.contains("SECRET-TOKEN-42"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_failure_reason_omits_offending_value() {
        let body = r#"{"status":"success","randomUserId":9876543210}"#;
        let err =
            classify::<IssuedIdentity>(Operation::Register, StatusCode::OK, body).unwrap_err();
        let text = err.to_string();
        assert!(!text.contains("9876543210"), "{text}");
    }
}
