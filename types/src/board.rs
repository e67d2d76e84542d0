//! Board records as returned by the remote API.
//!
//! Records are immutable from the client's point of view; the API exposes no
//! edit or delete operations.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Identity, PostId, ThreadId, WireNumber, abbreviate};

/// Author of a thread or post. Other users' tokens are displayed, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn abbreviated(&self) -> String {
        abbreviate(&self.0)
    }

    #[must_use]
    pub fn is(&self, identity: &Identity) -> bool {
        self.0 == identity.as_str()
    }
}

/// Server timestamp, kept as sent and ordered by its parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatedAt(String);

const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const ISO_LOCAL_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

impl CreatedAt {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the raw value. Offsets are normalized to UTC; naive values are taken as-is.
    #[must_use]
    pub fn parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, SQL_DATETIME)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, ISO_LOCAL_DATETIME))
            .ok()
    }

    /// Newest first; values that do not parse sort after all parseable ones.
    #[must_use]
    pub fn newest_first(&self, other: &Self) -> Ordering {
        match (self.parsed(), other.parsed()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    #[serde(rename = "random_user_id")]
    pub author: AuthorId,
    pub title: String,
    pub created_at: CreatedAt,
    /// Server-computed number of replies; only the list endpoint reports it.
    #[serde(
        rename = "post_count",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub reply_count: Option<u64>,
}

/// A reply within a thread. The owning thread id is known out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "random_user_id")]
    pub author: AuthorId,
    pub content: String,
    pub created_at: CreatedAt,
}

/// Sort posts newest first without relying on the server's order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| a.created_at.newest_first(&b.created_at));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadHeader {
    pub id: ThreadId,
    pub title: String,
}

/// Result of the thread-posts query: the thread's header plus its posts, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPosts {
    pub thread: ThreadHeader,
    pub posts: Vec<Post>,
}

impl ThreadPosts {
    #[must_use]
    pub fn new(thread: ThreadHeader, mut posts: Vec<Post>) -> Self {
        sort_newest_first(&mut posts);
        Self { thread, posts }
    }
}

/// Optional account details behind an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDetails {
    pub email: Option<String>,
    pub registered_at: Option<CreatedAt>,
}

/// Identity issued by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub identity: Identity,
    pub user_id: Option<u64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<WireNumber>::deserialize(deserializer)?;
    raw.map(|n| n.to_u64().map_err(serde::de::Error::custom))
        .transpose()
}
