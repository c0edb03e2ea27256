//! The category store: named, insertion-ordered lists of stored items.
//!
//! Categories keep the order they were created in and items keep the order
//! they were added in; both orders survive a serialize/deserialize round
//! trip because the persisted shape is a JSON object written and read
//! entry-by-entry.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{MycmdError, Result};
use crate::url::{is_duplicate, is_url, normalize_url};

/// A named, ordered list of stored text/URL items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

/// Result of a successful [`CategoryStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    /// The text actually stored (URL-normalized when classified as a link).
    pub stored: String,
    /// Whether the stored item was classified as a link.
    pub is_link: bool,
}

/// Mapping from category name to its ordered item list.
///
/// Backed by a `Vec` with linear name lookup; category names are unique and
/// iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStore {
    categories: Vec<Category>,
}

impl CategoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories (empty ones included).
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates categories in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Looks up a category by exact name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// Returns true if a category with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Creates an empty category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryExists` if the name is already taken.
    pub fn create(&mut self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(MycmdError::CategoryExists(name.to_string()));
        }
        self.categories.push(Category {
            name: name.to_string(),
            items: Vec::new(),
        });
        Ok(())
    }

    /// Deletes a category, which must exist and be empty.
    ///
    /// # Errors
    ///
    /// Returns `CategoryMissing` if absent, `CategoryNotEmpty` if it still
    /// holds items.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let position = self
            .categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| MycmdError::CategoryMissing(name.to_string()))?;
        let count = self.categories[position].items.len();
        if count > 0 {
            return Err(MycmdError::CategoryNotEmpty {
                name: name.to_string(),
                count,
            });
        }
        self.categories.remove(position);
        Ok(())
    }

    /// Adds an item to a category, creating the category if absent.
    ///
    /// URL-classified items are stored in normalized form. The duplicate
    /// policy is checked against the normalized text.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` naming the stored form when the policy
    /// matches an existing entry.
    pub fn add_item(&mut self, category: &str, raw_item: &str) -> Result<AddedItem> {
        let is_link = is_url(raw_item);
        let stored = if is_link {
            normalize_url(raw_item)
        } else {
            raw_item.to_string()
        };

        match self.get_mut(category) {
            Some(existing) => {
                if is_duplicate(&stored, &existing.items) {
                    return Err(MycmdError::DuplicateItem(stored));
                }
                existing.items.push(stored.clone());
            }
            None => self.categories.push(Category {
                name: category.to_string(),
                items: vec![stored.clone()],
            }),
        }

        Ok(AddedItem { stored, is_link })
    }

    /// Removes the item at a 1-based position, preserving the order of the
    /// rest, and returns its text.
    ///
    /// # Errors
    ///
    /// Returns `NothingToRemove` if the category is absent or empty,
    /// `IdOutOfRange` if the id falls outside `1..=len`.
    pub fn remove_by_id(&mut self, category: &str, id: usize) -> Result<String> {
        let Some(entry) = self.get_mut(category) else {
            return Err(MycmdError::NothingToRemove(category.to_string()));
        };
        if entry.items.is_empty() {
            return Err(MycmdError::NothingToRemove(category.to_string()));
        }
        if id < 1 || id > entry.items.len() {
            return Err(MycmdError::IdOutOfRange {
                category: category.to_string(),
                id,
                len: entry.items.len(),
            });
        }
        Ok(entry.items.remove(id - 1))
    }

    /// Removes the first item equal to the quoted literal, falling back to
    /// its URL-normalized form when the literal itself does not match.
    /// Returns the text actually removed. The normalized fallback applies
    /// to every category.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if the category is absent, `ItemMissing`
    /// if neither the literal nor its normalized form is present.
    pub fn remove_by_name(&mut self, category: &str, literal: &str) -> Result<String> {
        let Some(entry) = self.get_mut(category) else {
            return Err(MycmdError::UnknownCategory(category.to_string()));
        };

        let mut target = literal.to_string();
        if !entry.items.iter().any(|i| *i == target) {
            let normalized = normalize_url(literal);
            if normalized != target && entry.items.iter().any(|i| *i == normalized) {
                target = normalized;
            }
        }

        match entry.items.iter().position(|i| *i == target) {
            Some(position) => Ok(entry.items.remove(position)),
            None => Err(MycmdError::ItemMissing {
                category: category.to_string(),
                item: literal.to_string(),
            }),
        }
    }

    /// Merges an imported store into this one: same-named categories are
    /// overwritten in place, new categories appended. Returns the number of
    /// categories taken from `imported`.
    pub fn merge(&mut self, imported: CategoryStore) -> usize {
        let count = imported.len();
        for category in imported.categories {
            match self.get_mut(&category.name) {
                Some(existing) => existing.items = category.items,
                None => self.categories.push(category),
            }
        }
        count
    }
}

impl Serialize for CategoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = CategoryStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to item arrays")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, items)) = access.next_entry::<String, Vec<String>>()? {
                    categories.push(Category { name, items });
                }
                Ok(CategoryStore { categories })
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list_order() {
        let mut store = CategoryStore::new();
        store.create("links").unwrap();
        store.create("projects").unwrap();
        store.create("courses").unwrap();

        let names: Vec<&str> = store.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["links", "projects", "courses"]);
    }

    #[test]
    fn test_create_existing_fails() {
        let mut store = CategoryStore::new();
        store.create("links").unwrap();
        assert!(matches!(
            store.create("links"),
            Err(MycmdError::CategoryExists(_))
        ));
    }

    #[test]
    fn test_delete_missing_and_non_empty() {
        let mut store = CategoryStore::new();
        assert!(matches!(
            store.delete("links"),
            Err(MycmdError::CategoryMissing(_))
        ));

        store.add_item("links", "github.com").unwrap();
        let err = store.delete("links").unwrap_err();
        assert!(matches!(err, MycmdError::CategoryNotEmpty { count: 1, .. }));
        // Failed deletion leaves the category and its items unchanged.
        assert_eq!(store.get("links").unwrap().items.len(), 1);
    }

    #[test]
    fn test_delete_after_emptying() {
        let mut store = CategoryStore::new();
        store.add_item("links", "github.com").unwrap();
        store.remove_by_id("links", 1).unwrap();
        store.delete("links").unwrap();
        assert!(!store.contains("links"));
    }

    #[test]
    fn test_add_item_normalizes_links() {
        let mut store = CategoryStore::new();
        let added = store.add_item("links", "github.com").unwrap();
        assert_eq!(added.stored, "https://github.com");
        assert!(added.is_link);
    }

    #[test]
    fn test_add_item_keeps_plain_text() {
        let mut store = CategoryStore::new();
        let added = store.add_item("notes", "finish the report").unwrap();
        assert_eq!(added.stored, "finish the report");
        assert!(!added.is_link);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut store = CategoryStore::new();
        store.add_item("links", "github.com").unwrap();

        let err = store.add_item("links", "https://github.com").unwrap_err();
        assert!(matches!(err, MycmdError::DuplicateItem(_)));
        assert_eq!(store.get("links").unwrap().items.len(), 1);
    }

    #[test]
    fn test_add_duplicate_plain_text_any_case() {
        let mut store = CategoryStore::new();
        store.add_item("notes", "Buy milk").unwrap();
        assert!(store.add_item("notes", "buy milk").is_err());
    }

    #[test]
    fn test_remove_by_id_out_of_range() {
        let mut store = CategoryStore::new();
        store.add_item("links", "a.com").unwrap();

        let err = store.remove_by_id("links", 2).unwrap_err();
        assert!(matches!(err, MycmdError::IdOutOfRange { len: 1, .. }));
        assert_eq!(store.get("links").unwrap().items.len(), 1);

        assert!(matches!(
            store.remove_by_id("links", 0),
            Err(MycmdError::IdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_remove_by_id_preserves_order() {
        let mut store = CategoryStore::new();
        store.add_item("notes", "one").unwrap();
        store.add_item("notes", "two").unwrap();
        store.add_item("notes", "three").unwrap();

        let removed = store.remove_by_id("notes", 2).unwrap();
        assert_eq!(removed, "two");
        assert_eq!(store.get("notes").unwrap().items, vec!["one", "three"]);
    }

    #[test]
    fn test_remove_by_name_literal() {
        let mut store = CategoryStore::new();
        store.add_item("notes", "call mom").unwrap();
        let removed = store.remove_by_name("notes", "call mom").unwrap();
        assert_eq!(removed, "call mom");
        assert!(store.get("notes").unwrap().items.is_empty());
    }

    #[test]
    fn test_remove_by_name_normalized_fallback() {
        let mut store = CategoryStore::new();
        store.add_item("links", "github.com").unwrap();

        // The literal text is not stored, but its normalized form is.
        let removed = store.remove_by_name("links", "github.com").unwrap();
        assert_eq!(removed, "https://github.com");
    }

    #[test]
    fn test_remove_by_name_errors() {
        let mut store = CategoryStore::new();
        assert!(matches!(
            store.remove_by_name("ghost", "x"),
            Err(MycmdError::UnknownCategory(_))
        ));

        store.add_item("notes", "a").unwrap();
        assert!(matches!(
            store.remove_by_name("notes", "b"),
            Err(MycmdError::ItemMissing { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_preserves_order() {
        let mut store = CategoryStore::new();
        store.create("zeta").unwrap();
        store.create("alpha").unwrap();
        store.add_item("zeta", "one").unwrap();
        store.add_item("zeta", "two").unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let restored: CategoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, store);

        let names: Vec<&str> = restored.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_merge_overwrites_and_appends() {
        let mut store = CategoryStore::new();
        store.add_item("links", "a.com").unwrap();
        store.create("notes").unwrap();

        let mut imported = CategoryStore::new();
        imported.add_item("links", "b.com").unwrap();
        imported.add_item("projects", "mycmd").unwrap();

        let count = store.merge(imported);
        assert_eq!(count, 2);
        assert_eq!(store.get("links").unwrap().items, vec!["https://b.com"]);
        assert!(store.contains("projects"));
        let names: Vec<&str> = store.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["links", "notes", "projects"]);
    }
}
