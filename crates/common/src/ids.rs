use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an evidence record, unique within one collection.
///
/// Upstream sources hand out either numeric keys (database rows, patent
/// numbers) or string keys (DOIs, Semantic Scholar hashes, Reddit ids), so
/// both shapes are accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::Number(id.into())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}
