use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-agent key/value scratch space shared by every node in a tree.
///
/// Keys are plain strings and values are JSON data, so contents survive a
/// save/load round trip via [`Blackboard::snapshot`] / [`Blackboard::restore`]
/// while tree topology stays code-defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blackboard {
    values: BTreeMap<String, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Removes `key` if present; absent keys are not an error.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat copy of the current contents for an external save system.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.values.clone()
    }

    /// Replaces the contents wholesale with a previously taken snapshot.
    pub fn restore(&mut self, snapshot: BTreeMap<String, Value>) {
        self.values = snapshot;
    }
}
