//! Body and query parameters
//!
//! Null values are dropped and top-level booleans are sent as the strings
//! `"true"`/`"false"`, which is what the Webex services expect in both
//! query strings and JSON bodies.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameter {
    values: Map<String, Value>,
}

impl RequestParameter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value; `None` and null are ignored.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        match value.into() {
            Value::Null => {}
            Value::Bool(flag) => {
                self.values.insert(key.into(), Value::String(flag.to_string()));
            }
            other => {
                self.values.insert(key.into(), other);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Body form as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Flattened `key=value` pairs for query strings and form bodies.
    /// Strings are sent bare, everything else as its JSON text.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }

    /// URL-form encoding of [`Self::to_pairs`].
    pub fn to_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

impl From<Map<String, Value>> for RequestParameter {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().fold(Self::new(), |params, (key, value)| params.with(key, value))
    }
}
