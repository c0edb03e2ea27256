//! The alias registry: short names mapped to fully-qualified URLs.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{MycmdError, Result};

/// A short name mapped to a URL, opened via bare-name entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub url: String,
}

/// Mapping from alias name to target URL, in creation order.
///
/// Alias names are unique; targets are always stored in fully-qualified
/// `http(s)://` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRegistry {
    aliases: Vec<Alias>,
}

impl AliasRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterates aliases in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.iter()
    }

    /// Returns the target URL for an alias name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.url.as_str())
    }

    /// Creates an alias and returns the URL as stored.
    ///
    /// Normalization is driven off a literal `http` prefix check: anything
    /// not starting with `http` gets `https://` prepended. This is looser
    /// than the link-classification heuristic in [`crate::url`].
    ///
    /// # Errors
    ///
    /// Returns `AliasExists` if the name is already registered; it must be
    /// removed before it can be recreated.
    pub fn create(&mut self, url: &str, name: &str) -> Result<String> {
        if self.get(name).is_some() {
            return Err(MycmdError::AliasExists(name.to_string()));
        }
        let stored = if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        self.aliases.push(Alias {
            name: name.to_string(),
            url: stored.clone(),
        });
        Ok(stored)
    }

    /// Removes an alias and returns the URL it pointed at.
    ///
    /// # Errors
    ///
    /// Returns `AliasMissing` if the name is not registered.
    pub fn remove(&mut self, name: &str) -> Result<String> {
        let position = self
            .aliases
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| MycmdError::AliasMissing(name.to_string()))?;
        Ok(self.aliases.remove(position).url)
    }

    /// Merges an imported registry: same-named aliases are overwritten in
    /// place, new ones appended. Returns the number of aliases taken from
    /// `imported`.
    pub fn merge(&mut self, imported: AliasRegistry) -> usize {
        let count = imported.len();
        for alias in imported.aliases {
            match self.aliases.iter_mut().find(|a| a.name == alias.name) {
                Some(existing) => existing.url = alias.url,
                None => self.aliases.push(alias),
            }
        }
        count
    }
}

impl Serialize for AliasRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.aliases.len()))?;
        for alias in &self.aliases {
            map.serialize_entry(&alias.name, &alias.url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AliasRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = AliasRegistry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of alias names to URLs")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut aliases = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, url)) = access.next_entry::<String, String>()? {
                    aliases.push(Alias { name, url });
                }
                Ok(AliasRegistry { aliases })
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}
