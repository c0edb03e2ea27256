//! Recall history of submitted command lines.
//!
//! Pure recall state: the literal command text, deduplicated only when the
//! same line is submitted twice in a row. The secret word is filtered out
//! by the dispatcher before it ever reaches here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    /// Appends a command unless it equals the immediately preceding entry.
    /// Returns whether the entry was appended.
    pub fn push(&mut self, command: &str) -> bool {
        if self.entries.last().is_some_and(|last| last == command) {
            return false;
        }
        self.entries.push(command.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
