//! The flat attribute bag the host hands to every callback.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::lifecycle::InstanceState;

/// Identifier, lifecycle state and attributes of one resource instance.
///
/// A `null` attribute is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    state: InstanceState,
    attributes: BTreeMap<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let mut data = Self::new();
        data.set_id(id);
        data
    }

    /// Build from a JSON object of attributes.
    pub fn from_json(value: Value) -> Result<Self, ProviderError> {
        match value {
            Value::Object(map) => Ok(Self {
                attributes: map.into_iter().collect(),
                ..Self::default()
            }),
            other => Err(ProviderError::InvalidValue {
                name: "<root>".to_string(),
                reason: format!("expected an object of attributes, got {}", type_name(&other)),
            }),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn require_id(&self) -> Result<&str, ProviderError> {
        self.id().ok_or(ProviderError::MissingId)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
    }

    /// Tell the host the remote object is gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn set_state(&mut self, state: InstanceState) {
        self.state = state;
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// `None` stores `null`.
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        self.set(key, value.map_or(Value::Null, Into::into));
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, ProviderError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(key, "string", other)),
        }
    }

    pub fn require_string(&self, key: &str) -> Result<String, ProviderError> {
        self.get_string(key)?
            .ok_or_else(|| ProviderError::MissingAttribute(key.to_string()))
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ProviderError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(key, "bool", other)),
        }
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ProviderError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| mismatch(key, "integer", &Value::Number(n.clone()))),
            Some(other) => Err(mismatch(key, "integer", other)),
        }
    }

    pub fn get_map(&self, key: &str) -> Result<Option<Map<String, Value>>, ProviderError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(other) => Err(mismatch(key, "map", other)),
        }
    }
}

pub(crate) fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
    .to_string()
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> ProviderError {
    ProviderError::AttributeType {
        name: key.to_string(),
        expected,
        found: type_name(found),
    }
}
