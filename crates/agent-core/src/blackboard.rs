//! Shared state for one orchestration run
//!
//! The `Blackboard` is the key-value store agents use to hand data to each
//! other: an agent with an output slot writes its final text under that key,
//! and later agents read it back through `{key}` placeholders in their
//! instruction templates.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::{Error, Result};

/// `{name}` is required, `{name?}` renders empty when the key is missing.
/// Braced text that is not an identifier (JSON snippets etc.) is left alone.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(\?)?\}").expect("placeholder pattern is valid")
});

/// A placeholder found in an instruction template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Blackboard key the placeholder refers to
    pub key: String,
    /// Whether the placeholder was written as `{key?}`
    pub optional: bool,
}

/// List the placeholders of a template in order of appearance
///
/// # Example
///
/// ```
/// use agent_core::blackboard::placeholders;
///
/// let found = placeholders("Story: {current_story}\nCritique: {critique?}");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].key, "current_story");
/// assert!(found[1].optional);
/// ```
pub fn placeholders(template: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| Placeholder {
            key: caps[1].to_string(),
            optional: caps.get(2).is_some(),
        })
        .collect()
}

/// Shared key-value store scoped to a single run
///
/// Cloning a `Blackboard` yields another handle to the same store, which is
/// how every node of an orchestration tree sees the same state. Writes are
/// last-writer-wins; there is no removal.
///
/// # Example
///
/// ```
/// use agent_core::Blackboard;
///
/// let board = Blackboard::new();
/// board.set("blog_outline", "1. Intro\n2. Body");
///
/// let rendered = board.render("Following this outline strictly: {blog_outline}").unwrap();
/// assert_eq!(rendered, "Following this outline strictly: 1. Intro\n2. Body");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    data: Arc<RwLock<HashMap<String, Value>>>,
}

impl Blackboard {
    /// Create a new empty blackboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value (builder style)
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    // =========== Key-Value Operations ===========

    /// Write a value, replacing any previous value under the same key
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Read a value
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Read a value rendered as text (strings verbatim, everything else as JSON)
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value_to_text(&value))
    }

    /// Insert a typed value
    ///
    /// Serializes the value to JSON before storing.
    pub fn set_typed<T: Serialize>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            Error::ProcessingFailed(format!("Failed to serialize blackboard value: {e}"))
        })?;
        self.set(key, json_value);
        Ok(())
    }

    /// Get a typed value
    ///
    /// Deserializes the JSON value into the specified type.
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value).map_err(|e| {
                    Error::ProcessingFailed(format!("Failed to deserialize blackboard value: {e}"))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the blackboard is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // =========== Templates ===========

    /// Substitute every `{key}` placeholder with the stored value
    ///
    /// Fails with [`Error::TemplateResolution`] listing every missing key if
    /// any required placeholder has no value. Rendering never writes to the
    /// blackboard.
    pub fn render(&self, template: &str) -> Result<String> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);

        let mut missing: Vec<String> = Vec::new();
        for placeholder in placeholders(template) {
            if !placeholder.optional
                && !data.contains_key(&placeholder.key)
                && !missing.contains(&placeholder.key)
            {
                missing.push(placeholder.key);
            }
        }
        if !missing.is_empty() {
            return Err(Error::TemplateResolution { missing });
        }

        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            data.get(&caps[1]).map(value_to_text).unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Blackboard {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let board = Self::new();
        for (key, value) in iter {
            board.set(key, value);
        }
        board
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
