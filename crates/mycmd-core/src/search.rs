//! Case-insensitive substring search across everything the session stores.

use crate::alias::AliasRegistry;
use crate::category::CategoryStore;
use crate::history::CommandHistory;

/// Runs a grep over category names, items, aliases, and command history.
///
/// Matches come back pre-formatted, in a fixed order: categories and their
/// items first, then aliases, then history. Item and history labels are
/// 1-based.
pub fn grep(
    term: &str,
    categories: &CategoryStore,
    aliases: &AliasRegistry,
    history: &CommandHistory,
) -> Vec<String> {
    let needle = term.to_lowercase();
    let mut results = Vec::new();

    for category in categories.iter() {
        if category.name.to_lowercase().contains(&needle) {
            results.push(format!("Category: {}", category.name));
        }
        for (index, item) in category.items.iter().enumerate() {
            if item.to_lowercase().contains(&needle) {
                results.push(format!("{}[{}]: {}", category.name, index + 1, item));
            }
        }
    }

    for alias in aliases.iter() {
        if alias.name.to_lowercase().contains(&needle) || alias.url.to_lowercase().contains(&needle)
        {
            results.push(format!("Alias: {} -> {}", alias.name, alias.url));
        }
    }

    for (index, command) in history.iter().enumerate() {
        if command.to_lowercase().contains(&needle) {
            results.push(format!("History[{}]: {}", index + 1, command));
        }
    }

    results
}
