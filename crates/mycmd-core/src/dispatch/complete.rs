//! Autocomplete over the fixed authenticated-mode keyword list.

/// Keyword list in suggestion priority order: utility commands first, then
/// alias management, then data commands, then `logout`.
pub const COMMAND_KEYWORDS: &[&str] = &[
    "help",
    "clear",
    "debug",
    "stats",
    "uptime",
    "grep",
    "quote",
    "export",
    "import",
    "alias",
    "aliaslist",
    "removealias",
    "categories",
    "cats",
    "addcat",
    "removecat",
    "add",
    "remove",
    "logout",
];

/// Returns the remaining suffix of the first keyword that starts with the
/// trimmed, lowercased input without being equal to it. No suggestion is
/// offered while unauthenticated or on empty input.
pub fn suggest(input: &str, authenticated: bool) -> Option<String> {
    if !authenticated {
        return None;
    }
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    COMMAND_KEYWORDS
        .iter()
        .find(|keyword| keyword.starts_with(&trimmed) && **keyword != trimmed)
        .map(|keyword| keyword[trimmed.len()..].to_string())
}
