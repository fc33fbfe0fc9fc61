use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::{MatchError, Result};

/// Built-in context keys every store starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    EditorFocus,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::EditorFocus => "editorFocus",
        }
    }
}

impl AsRef<str> for ContextKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Named facts about the running session.
///
/// Values are opaque JSON; they only become booleans when an expression reads
/// them through [`truthy`]. Keys are never removed, only overwritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextStore {
    entries: HashMap<String, Value>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// A fresh store seeded with `editorFocus = true`.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(ContextKey::EditorFocus.as_str().to_string(), Value::Bool(true));
        Self { entries }
    }

    /// Seeded store overlaid with the keys of a JSON object, e.g.
    ///   {"active": true, "openEditors": 3}
    pub fn from_json(facts: &str) -> Result<Self> {
        let parsed: Value =
            serde_json::from_str(facts).map_err(|e| MatchError::InvalidFacts(e.to_string()))?;
        let Value::Object(map) = parsed else {
            return Err(MatchError::InvalidFacts(
                "facts must be a JSON object".into(),
            ));
        };
        let mut store = Self::new();
        store.entries.extend(map);
        Ok(store)
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Stored value converted to `T`; `None` when unset or not representable as `T`.
    pub fn get_context<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Coerced lookup; `None` when the key was never set.
    pub fn is_truthy(&self, key: &str) -> Option<bool> {
        self.entries.get(key).map(truthy)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Empty/zero/absent is false, everything else true. Arrays and objects are
/// always true, even when empty.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
