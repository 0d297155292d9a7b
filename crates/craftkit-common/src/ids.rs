//! Identity types for items and recipes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Namespace used when a key is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Custom model data attached to a stack.
///
/// Used as the auxiliary discriminator when two stacks share a kind.
pub type ModelData = i32;

/// Stable, namespaced identity of an item kind (`namespace:path`).
///
/// This is the key persisted on custom items, so it is what ingredient
/// comparison uses instead of any transient host object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey(String);

impl ItemKey {
    /// Creates a key from a namespace and a path.
    pub fn new(namespace: &str, path: &str) -> Result<Self, KeyError> {
        validate_namespace(namespace)?;
        validate_path(path)?;
        Ok(Self(format!("{namespace}:{path}")))
    }

    /// Creates a key in the default namespace.
    ///
    /// Intended for well-known vanilla kinds; the path is only checked in
    /// debug builds. Use [`ItemKey::parse`] for untrusted input.
    #[must_use]
    pub fn minecraft(path: &str) -> Self {
        debug_assert!(
            validate_path(path).is_ok(),
            "invalid vanilla item path {path:?}"
        );
        Self(format!("{DEFAULT_NAMESPACE}:{path}"))
    }

    /// Parses `namespace:path`, or `path` in the default namespace.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        match raw.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, raw),
        }
    }

    /// Returns the full `namespace:path` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or(DEFAULT_NAMESPACE, |(ns, _)| ns)
    }

    /// Returns the path part.
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
    }
}

fn validate_namespace(namespace: &str) -> Result<(), KeyError> {
    if namespace.is_empty() {
        return Err(KeyError::Empty);
    }
    match namespace
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
    {
        Some(c) => Err(KeyError::InvalidNamespace {
            namespace: namespace.to_string(),
            character: c,
        }),
        None => Ok(()),
    }
}

fn validate_path(path: &str) -> Result<(), KeyError> {
    if path.is_empty() {
        return Err(KeyError::Empty);
    }
    match path
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '/' | '.' | '_' | '-'))
    {
        Some(c) => Err(KeyError::InvalidPath {
            path: path.to_string(),
            character: c,
        }),
        None => Ok(()),
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_namespace() {
        let key = ItemKey::parse("gems:ruby_sword").expect("valid key");
        assert_eq!(key.namespace(), "gems");
        assert_eq!(key.path(), "ruby_sword");
        assert_eq!(key.to_string(), "gems:ruby_sword");
    }

    #[test]
    fn test_parse_defaults_namespace() {
        let key: ItemKey = "oak_planks".parse().expect("valid key");
        assert_eq!(key, ItemKey::minecraft("oak_planks"));
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        let err = ItemKey::parse("Gems:ruby").unwrap_err();
        assert!(matches!(
            err,
            KeyError::InvalidNamespace { character: 'G', .. }
        ));
    }

    #[test]
    fn test_path_allows_slashes() {
        assert!(ItemKey::parse("gems:tools/ruby_pick").is_ok());
        assert!(ItemKey::parse("gems/tools:ruby").is_err());
    }

    #[test]
    fn test_empty_parts_rejected() {
        assert!(matches!(ItemKey::parse("gems:"), Err(KeyError::Empty)));
        assert!(matches!(ItemKey::parse(":ruby"), Err(KeyError::Empty)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid vanilla item path")]
    fn test_minecraft_rejects_namespaced_path() {
        let _ = ItemKey::minecraft("stone:slab");
    }

    #[test]
    fn test_minecraft_splits_cleanly() {
        let key = ItemKey::minecraft("music_disc/cat");
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.path(), "music_disc/cat");
    }

    #[test]
    fn test_string_conversions() {
        let key = ItemKey::try_from("gems:ruby".to_string()).expect("valid key");
        let raw: String = key.clone().into();
        assert_eq!(raw, "gems:ruby");
        assert!(ItemKey::try_from("gems:Ruby".to_string()).is_err());
    }
}
