use crate::{bot::CommandError, registry::Registry};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    ops::Deref,
};

/// The keyword arguments of a single command invocation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kwargs(HashMap<String, Value>);

impl Kwargs {
    /// Creates an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value and returns the map. Useful for building arguments
    /// inline.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: ToString,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: ToString,
        V: Into<Value>,
    {
        self.0.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns all string elements of the array stored under `key`. Returns
    /// an empty list if `key` is missing or not an array.
    pub fn strings(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the value of a required argument.
    pub fn require(&self, key: &str) -> Result<&Value, CommandError> {
        self.0
            .get(key)
            .ok_or_else(|| CommandError::new(format!("missing argument `{}`", key)))
    }
}

impl Deref for Kwargs {
    type Target = HashMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<HashMap<String, Value>> for Kwargs {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Kwargs
where
    K: ToString,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.to_string(), value.into()))
                .collect(),
        )
    }
}

/// The context passed to a command handler.
#[derive(Clone)]
pub struct Context {
    pub registry: Registry,
    pub kwargs: Kwargs,
}

impl Context {
    pub fn new(registry: Registry, kwargs: Kwargs) -> Self {
        Self { registry, kwargs }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("kwargs", &self.kwargs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Kwargs;
    use serde_json::json;

    #[test]
    fn test_kwargs_strings() {
        let kwargs = Kwargs::new()
            .with("args", vec!["play", "song"])
            .with("volume", 50);

        assert_eq!(kwargs.strings("args"), vec!["play", "song"]);
        assert!(kwargs.strings("volume").is_empty());
        assert!(kwargs.strings("missing").is_empty());
    }

    #[test]
    fn test_kwargs_require() {
        let kwargs: Kwargs = vec![("song_url", "https://example.com/a.mp3")]
            .into_iter()
            .collect();

        assert_eq!(
            kwargs.require("song_url").unwrap(),
            &json!("https://example.com/a.mp3")
        );
        assert_eq!(
            kwargs.require("volume").unwrap_err().message,
            "missing argument `volume`"
        );
        assert_eq!(kwargs.get_str("song_url"), Some("https://example.com/a.mp3"));
    }
}
