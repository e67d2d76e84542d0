//! HTTP client for the anonymous board API.
//!
//! # Architecture
//!
//! [`BoardClient`] exposes one async method per remote operation. Each call
//! goes through a single exchange path:
//!
//! 1. Refuse immediately with [`RemoteError::ConfigurationMissing`] when no base URL is set.
//! 2. Send the request. A send or read failure is a [`RemoteError::Transport`].
//! 3. Parse the JSON envelope. A parse failure, or a success missing a required
//!    payload field, is a [`RemoteError::MalformedResponse`].
//! 4. A parsed envelope with `status != "success"` or a non-2xx status is a
//!    [`RemoteError::Application`] carrying the server's `error_code` and `message`.
//!
//! No call is retried. Mapping codes to user-facing text is left to the caller.

mod error;
mod operation;
mod wire;

use std::time::Duration;

use board_config::ApiBase;
use board_types::{
    Credentials, Identity, IdentityDetails, PostContent, Registration, Thread, ThreadId,
    ThreadPosts, ThreadTitle,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub use error::{RemoteError, RemoteResult};
pub use operation::Operation;

use wire::{
    AccountDetails, CreatedThread, CredentialsBody, Empty, Envelope, IssuedIdentity, NewPostBody,
    NewThreadBody, PostList, ThreadList, classify, malformed,
};

// TCP keepalive idle time; interval and retries use platform defaults.
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Upper bound on a response body. Larger bodies are treated as malformed.
const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Portion of an offending body retained for logs.
pub const MAX_DIAGNOSTIC_BODY_BYTES: usize = 32 * 1024;

/// Server acknowledgement of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadCreated {
    pub thread_id: Option<ThreadId>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub registration: Registration,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIn {
    pub identity: Identity,
    pub message: Option<String>,
}

fn client_builder(connect_timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .user_agent(concat!("anonboard/", env!("CARGO_PKG_VERSION")))
}

enum Body<'a, B: Serialize> {
    None,
    Json(&'a B),
}

#[derive(Debug, Clone)]
pub struct BoardClient {
    base: Option<ApiBase>,
    http: reqwest::Client,
}

impl BoardClient {
    /// Build a client. `base` of `None` yields a client that refuses every call.
    pub fn new(base: Option<ApiBase>, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = client_builder(connect_timeout).build()?;
        Ok(Self { base, http })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    #[must_use]
    pub fn base(&self) -> Option<&ApiBase> {
        self.base.as_ref()
    }

    pub async fn register(&self, credentials: &Credentials) -> RemoteResult<Registered> {
        let op = Operation::Register;
        let body = CredentialsBody {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };
        let (status, raw, env) = self
            .exchange::<IssuedIdentity, _>(op, &[], Body::Json(&body))
            .await?;
        let identity = issued_identity(op, status, &raw, env.payload.random_user_id)?;
        let user_id = env.payload.id.and_then(|n| n.to_u64().ok());
        tracing::info!(identity = ?identity, "Registered");
        Ok(Registered {
            registration: Registration { identity, user_id },
            message: env.message,
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> RemoteResult<LoggedIn> {
        let op = Operation::Login;
        let body = CredentialsBody {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };
        let (status, raw, env) = self
            .exchange::<IssuedIdentity, _>(op, &[], Body::Json(&body))
            .await?;
        let identity = issued_identity(op, status, &raw, env.payload.random_user_id)?;
        tracing::info!(identity = ?identity, "Logged in");
        Ok(LoggedIn {
            identity,
            message: env.message,
        })
    }

    pub async fn list_threads(&self) -> RemoteResult<Vec<Thread>> {
        let op = Operation::ListThreads;
        let (status, raw, env) = self
            .exchange::<ThreadList, ()>(op, &[], Body::None)
            .await?;
        env.payload
            .threads
            .ok_or_else(|| malformed(op, status, &raw, "missing `threads`".to_string()))
    }

    pub async fn create_thread(
        &self,
        identity: &Identity,
        title: &ThreadTitle,
    ) -> RemoteResult<ThreadCreated> {
        let body = NewThreadBody {
            random_user_id: identity.as_str(),
            title: title.as_str(),
        };
        let (_, _, env) = self
            .exchange::<CreatedThread, _>(Operation::CreateThread, &[], Body::Json(&body))
            .await?;
        let thread_id = env
            .payload
            .thread_id
            .and_then(|n| n.to_u64().ok())
            .map(ThreadId::new);
        tracing::info!(thread_id = ?thread_id, "Thread created");
        Ok(ThreadCreated {
            thread_id,
            message: env.message,
        })
    }

    pub async fn list_thread_posts(&self, thread: ThreadId) -> RemoteResult<ThreadPosts> {
        let op = Operation::ListThreadPosts;
        let id = thread.to_string();
        let (status, raw, env) = self
            .exchange::<PostList, ()>(op, &[("thread_id", id.as_str())], Body::None)
            .await?;
        let PostList { thread: header, posts } = env.payload;
        match (header, posts) {
            (Some(header), Some(posts)) => Ok(ThreadPosts::new(header, posts)),
            (None, _) => Err(malformed(op, status, &raw, "missing `thread`".to_string())),
            (_, None) => Err(malformed(op, status, &raw, "missing `posts`".to_string())),
        }
    }

    pub async fn create_post(
        &self,
        identity: &Identity,
        thread: ThreadId,
        content: &PostContent,
    ) -> RemoteResult<Ack> {
        let body = NewPostBody {
            random_user_id: identity.as_str(),
            thread_id: thread.value(),
            content: content.as_str(),
        };
        let (_, _, env) = self
            .exchange::<Empty, _>(Operation::CreatePost, &[], Body::Json(&body))
            .await?;
        tracing::info!(thread_id = %thread, "Reply posted");
        Ok(Ack {
            message: env.message,
        })
    }

    /// Best-effort lookup of the account behind `identity`. Missing fields are not an error.
    pub async fn identity_details(&self, identity: &Identity) -> RemoteResult<IdentityDetails> {
        let (_, _, env) = self
            .exchange::<AccountDetails, ()>(
                Operation::IdentityDetails,
                &[("random_user_id", identity.as_str())],
                Body::None,
            )
            .await?;
        Ok(env.payload.into())
    }

    fn endpoint(&self, op: Operation, query: &[(&str, &str)]) -> RemoteResult<Url> {
        let base = self.base.as_ref().ok_or_else(|| {
            tracing::warn!(operation = %op, "Refusing call without an API base URL");
            RemoteError::ConfigurationMissing
        })?;
        let mut url = base.endpoint(op.path()).map_err(|e| RemoteError::Transport {
            operation: op,
            detail: format!("cannot build endpoint URL: {e}"),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn exchange<T, B>(
        &self,
        op: Operation,
        query: &[(&str, &str)],
        body: Body<'_, B>,
    ) -> RemoteResult<(StatusCode, String, Envelope<T>)>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.endpoint(op, query)?;
        // The query can carry the identity token; log the endpoint path only.
        tracing::debug!(operation = %op, path = op.path(), "Sending request");

        let mut request = self.http.request(op.method(), url);
        if let Body::Json(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| transport(op, e))?;
        let status = response.status();
        let raw = read_body(op, response).await?;
        let envelope = classify::<T>(op, status, &raw)?;
        Ok((status, raw, envelope))
    }
}

fn issued_identity(
    op: Operation,
    status: StatusCode,
    raw: &str,
    token: Option<String>,
) -> RemoteResult<Identity> {
    token
        .and_then(|t| Identity::new(t).ok())
        .ok_or_else(|| malformed(op, status, raw, "missing `randomUserId`".to_string()))
}

fn transport(op: Operation, err: reqwest::Error) -> RemoteError {
    // reqwest errors render their URL, query string included.
    let err = err.without_url();
    let detail = if err.is_timeout() {
        format!("timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    tracing::error!(operation = %op, "Transport failure: {detail}");
    RemoteError::Transport {
        operation: op,
        detail,
    }
}

/// Read the whole body, refusing anything over [`MAX_RESPONSE_BYTES`].
async fn read_body(op: Operation, response: reqwest::Response) -> RemoteResult<String> {
    use futures_util::StreamExt;

    let status = response.status();
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transport(op, e))?;
        body.extend_from_slice(&chunk);
        if body.len() > MAX_RESPONSE_BYTES {
            let text = String::from_utf8_lossy(&body).into_owned();
            return Err(malformed(
                op,
                status,
                &text,
                format!("body exceeds {MAX_RESPONSE_BYTES} bytes"),
            ));
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
