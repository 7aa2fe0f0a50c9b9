use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned document identifier. Short random alphanumeric string,
/// never supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(String);

impl DocId {
    pub(crate) fn generate() -> Self {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let id: String = (0..8)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        DocId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        DocId(s.to_string())
    }
}

/// Store-assigned creation time. `millis` comes from the store clock at
/// commit time; `seq` breaks ties when two commits land in the same
/// millisecond. Totally ordered, strictly increasing across commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub millis: u64,
    pub seq: u32,
}

/// A single document: identity, creation stamp, and a JSON field map.
/// Documents are owned by the store; values handed out are render-only
/// copies invalidated by the next snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub created_at: Timestamp,
    pub fields: serde_json::Map<String, Value>,
}

impl Document {
    /// Convenience accessor for string fields.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// Convenience accessor for integer fields.
    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(|v| v.as_i64())
    }

    /// True if the array field `key` contains `value`.
    pub fn array_contains(&self, key: &str, value: &Value) -> bool {
        self.fields
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().any(|v| v == value))
            .unwrap_or(false)
    }
}
