//! Language configuration for the pattern pass
//!
//! A [`LanguageConfig`] holds the four identifier sets the pattern pass
//! classifies: keywords, types, functions and semantic identifiers. Hosts store
//! them as string lists under the `fluffsl.` settings prefix; both the bare and
//! the prefixed key names are accepted when loading JSON, and a list given under
//! both names is the union of the two.
//!
//! # Example
//!
//! ```rust
//! use fsl_core::LanguageConfig;
//!
//! let config = LanguageConfig::new()
//!     .with_keywords(["if", "else", "return"])
//!     .with_types(["float", "float4"]);
//!
//! assert!(config.keywords.contains("return"));
//! assert!(config.functions.is_empty());
//! ```

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use crate::utils::{CoreError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod theme;

/// Identifier sets driving the pattern pass
///
/// Sets are ordered so the compiled pattern is identical for identical
/// configurations. An empty set is treated as unset by
/// [`LanguageConfig::seed_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LanguageConfig {
    /// Language keywords; preprocessor directives are always added on top
    pub keywords: BTreeSet<String>,

    /// Built-in type names
    pub types: BTreeSet<String>,

    /// Built-in function names
    pub functions: BTreeSet<String>,

    /// Semantic identifiers such as shader input/output bindings
    pub semantics: BTreeSet<String>,
}

impl LanguageConfig {
    /// Create a configuration with every set empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keywords
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Add type names
    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Add function names
    #[must_use]
    pub fn with_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(functions.into_iter().map(Into::into));
        self
    }

    /// Add semantic identifiers
    #[must_use]
    pub fn with_semantics<I, S>(mut self, semantics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.semantics.extend(semantics.into_iter().map(Into::into));
        self
    }

    /// Check if every set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.types.is_empty()
            && self.functions.is_empty()
            && self.semantics.is_empty()
    }

    /// Add every identifier of `other` to the matching set
    pub fn merge(&mut self, other: Self) {
        self.keywords.extend(other.keywords);
        self.types.extend(other.types);
        self.functions.extend(other.functions);
        self.semantics.extend(other.semantics);
    }

    /// Copy each set from `defaults` that is still empty here
    ///
    /// Sets the user already filled are left untouched. Returns `true` if any
    /// set was seeded.
    pub fn seed_defaults(&mut self, defaults: &Self) -> bool {
        let mut seeded = false;
        for (target, source) in [
            (&mut self.keywords, &defaults.keywords),
            (&mut self.types, &defaults.types),
            (&mut self.functions, &defaults.functions),
            (&mut self.semantics, &defaults.semantics),
        ] {
            if target.is_empty() && !source.is_empty() {
                target.clone_from(source);
                seeded = true;
            }
        }
        seeded
    }

    /// Replace one set from a host setting such as `fluffsl.keywords`
    ///
    /// `value` is a JSON array of strings. Keys outside the `fluffsl.` section
    /// or naming no set are ignored and return `false`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] if `value` is not an array of strings; the
    /// configuration is unchanged then.
    #[cfg(feature = "serde")]
    pub fn apply_host_setting(&mut self, key: &str, value: &str) -> Result<bool> {
        let Some(name) = key
            .strip_prefix(crate::SETTINGS_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
        else {
            return Ok(false);
        };
        let Some(set) = self.set_mut(name) else {
            return Ok(false);
        };

        *set = serde_json::from_str(value)?;
        Ok(true)
    }

    fn set_mut(&mut self, name: &str) -> Option<&mut BTreeSet<String>> {
        match name {
            "keywords" => Some(&mut self.keywords),
            "types" => Some(&mut self.types),
            "functions" => Some(&mut self.functions),
            "semantics" => Some(&mut self.semantics),
            _ => None,
        }
    }

    /// Parse a configuration from JSON
    ///
    /// Accepts a flat object (`{"keywords": [...]}` or host style
    /// `{"fluffsl.keywords": [...]}`, possibly mixed) and a settings object
    /// nesting the lists under a `"fluffsl"` key. Missing lists are empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] for malformed JSON or lists that are not
    /// arrays of strings.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        let Some(object) = value.as_object_mut() else {
            return Err(CoreError::config("expected a JSON object"));
        };

        if let Some(nested) = object.get_mut(crate::SETTINGS_PREFIX) {
            if nested.is_object() {
                return Ok(serde_json::from_value(nested.take())?);
            }
        }

        let prefix = format!("{}.", crate::SETTINGS_PREFIX);
        let host_keys: Vec<String> = object
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        let mut host = serde_json::Map::new();
        for key in host_keys {
            if let Some(list) = object.remove(&key) {
                host.insert(key[prefix.len()..].to_string(), list);
            }
        }

        let mut config: Self = serde_json::from_value(value)?;
        config.merge(serde_json::from_value(serde_json::Value::Object(host))?);
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read, or the errors of
    /// [`LanguageConfig::from_json_str`].
    #[cfg(feature = "serde")]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
