use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LifecycleError, LifecycleResult};

/// Declarative chart specification handed to the backend.
///
/// The lifecycle layer treats it as data. It only ever merges top-level keys,
/// fills missing top-level keys from defaults, or swaps it wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartSpec(Map<String, Value>);

impl ChartSpec {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_value(value: Value) -> LifecycleResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LifecycleError::InvalidSpec(format!(
                "chart spec must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(input: &str) -> LifecycleResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            LifecycleError::InvalidSpec(format!("failed to parse chart spec json: {e}"))
        })?;
        Self::from_value(value)
    }

    /// Overrides every top-level key present in `patch`; other keys are kept.
    pub fn merge_from(&mut self, patch: &ChartSpec) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn merged(&self, patch: &ChartSpec) -> Self {
        let mut merged = self.clone();
        merged.merge_from(patch);
        merged
    }

    pub fn replace_with(&mut self, spec: ChartSpec) {
        self.0 = spec.0;
    }

    /// Shallow defaulting: fills top-level keys missing from `self`.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &ChartSpec) -> Self {
        for (key, value) in &defaults.0 {
            if !self.0.contains_key(key) {
                self.0.insert(key.clone(), value.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl TryFrom<Value> for ChartSpec {
    type Error = LifecycleError;

    fn try_from(value: Value) -> LifecycleResult<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for ChartSpec {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
