use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric value as it appears on the wire.
///
/// The board API is not consistent about numeric columns: some endpoints emit
/// JSON numbers, others emit the database's string rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(u64),
    Text(String),
}

impl WireNumber {
    pub fn to_u64(&self) -> Result<u64, String> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid numeric value {raw:?}: {e}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WireNumber", into = "u64")]
pub struct ThreadId(u64);

impl ThreadId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<WireNumber> for ThreadId {
    type Error = String;

    fn try_from(value: WireNumber) -> Result<Self, Self::Error> {
        value.to_u64().map(Self)
    }
}

impl From<ThreadId> for u64 {
    fn from(value: ThreadId) -> Self {
        value.0
    }
}

impl FromStr for ThreadId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireNumber", into = "u64")]
pub struct PostId(u64);

impl PostId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<WireNumber> for PostId {
    type Error = String;

    fn try_from(value: WireNumber) -> Result<Self, Self::Error> {
        value.to_u64().map(Self)
    }
}

impl From<PostId> for u64 {
    fn from(value: PostId) -> Self {
        value.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{PostId, ThreadId};

    #[test]
    fn thread_id_accepts_number_and_numeric_string() {
        let a: ThreadId = serde_json::from_str("7").unwrap();
        let b: ThreadId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.value(), 7);
    }

    #[test]
    fn thread_id_rejects_non_numeric_string() {
        assert!(serde_json::from_str::<ThreadId>("\"seven\"").is_err());
    }

    #[test]
    fn thread_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ThreadId::new(12)).unwrap(), "12");
    }

    #[test]
    fn thread_id_parses_from_cli_text() {
        assert_eq!(" 42 ".parse::<ThreadId>().unwrap(), ThreadId::new(42));
        assert!("abc".parse::<ThreadId>().is_err());
    }

    #[test]
    fn post_id_display() {
        assert_eq!(PostId::new(3).to_string(), "3");
    }
}
