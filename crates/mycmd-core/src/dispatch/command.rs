//! Command shapes and the ordered recognizer table.
//!
//! Each recognizer either claims the line (returning a parsed command,
//! possibly a syntax error for its own grammar) or passes. The table order
//! is the dispatch order and is load-bearing: explicit command shapes come
//! before the category-name check, which comes before bare alias
//! execution, so an alias can never shadow a command or a category.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::session::Session;

/// A fully recognized command, arguments parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Debug,
    Stats,
    Uptime,
    Grep { term: String },
    Quote,
    Export { path: Option<PathBuf> },
    Import { path: Option<PathBuf> },
    ListCategories,
    CreateCategory { name: String },
    DeleteCategory { name: String },
    AddItem { item: String, category: String },
    RemoveById { id: usize, category: String },
    RemoveByName { item: String, category: String },
    CreateAlias { url: String, name: String },
    ListAliases,
    RemoveAlias { name: String },
    ShowCategory { name: String },
    OpenAlias { name: String },
    /// A keyword claimed the line but its arguments did not parse.
    Invalid(SyntaxHint),
}

/// Which usage hint to print for a malformed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxHint {
    AddCat,
    RemoveCat,
    Add,
    Remove,
    Alias,
    RemoveAlias,
}

pub(super) type Recognizer = fn(&str, &Session) -> Option<Command>;

/// Dispatch order per the recognizer chain contract.
pub(super) const RECOGNIZERS: &[Recognizer] = &[
    recognize_help,
    recognize_utility,
    recognize_alias_management,
    recognize_data,
    recognize_category_display,
    recognize_alias_execution,
];

static ALIAS_PATTERN: OnceLock<Regex> = OnceLock::new();
static ADDCAT_PATTERN: OnceLock<Regex> = OnceLock::new();
static REMOVECAT_PATTERN: OnceLock<Regex> = OnceLock::new();
static ADD_PATTERN: OnceLock<Regex> = OnceLock::new();
static REMOVE_ID_PATTERN: OnceLock<Regex> = OnceLock::new();
static REMOVE_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn alias_pattern() -> &'static Regex {
    ALIAS_PATTERN.get_or_init(|| Regex::new(r#"alias\s+"(.+?)"\s+as\s+(\w+)"#).unwrap())
}

fn addcat_pattern() -> &'static Regex {
    // Quoted form takes precedence: the alternation tries it first.
    ADDCAT_PATTERN.get_or_init(|| Regex::new(r#"addcat\s+"(.+?)"|addcat\s+(\w+)"#).unwrap())
}

fn removecat_pattern() -> &'static Regex {
    REMOVECAT_PATTERN.get_or_init(|| Regex::new(r#"removecat\s+"(.+?)"|removecat\s+(\w+)"#).unwrap())
}

fn add_pattern() -> &'static Regex {
    ADD_PATTERN.get_or_init(|| Regex::new(r#"add\s+"(.+?)"\s+in\s+(\w+)"#).unwrap())
}

fn remove_id_pattern() -> &'static Regex {
    REMOVE_ID_PATTERN.get_or_init(|| Regex::new(r"remove\s+(\d+)\s+from\s+(\w+)").unwrap())
}

fn remove_name_pattern() -> &'static Regex {
    REMOVE_NAME_PATTERN.get_or_init(|| Regex::new(r#"remove\s+"(.+?)"\s+from\s+(\w+)"#).unwrap())
}

fn recognize_help(line: &str, _session: &Session) -> Option<Command> {
    (line == "help").then_some(Command::Help)
}

fn recognize_utility(line: &str, _session: &Session) -> Option<Command> {
    match line {
        "clear" => return Some(Command::Clear),
        "debug" => return Some(Command::Debug),
        "stats" => return Some(Command::Stats),
        "uptime" => return Some(Command::Uptime),
        "quote" => return Some(Command::Quote),
        _ => {}
    }
    if let Some(rest) = line.strip_prefix("grep") {
        return Some(Command::Grep {
            term: rest.trim().to_string(),
        });
    }
    if line == "export" {
        return Some(Command::Export { path: None });
    }
    if let Some(rest) = line.strip_prefix("export ") {
        return Some(Command::Export {
            path: Some(PathBuf::from(rest.trim())),
        });
    }
    if line == "import" {
        return Some(Command::Import { path: None });
    }
    if let Some(rest) = line.strip_prefix("import ") {
        let rest = rest.trim();
        if rest.is_empty() {
            return Some(Command::Import { path: None });
        }
        return Some(Command::Import {
            path: Some(PathBuf::from(rest)),
        });
    }
    None
}

fn recognize_alias_management(line: &str, _session: &Session) -> Option<Command> {
    if line.starts_with("alias ") {
        return Some(match alias_pattern().captures(line) {
            Some(captures) => Command::CreateAlias {
                url: captures[1].to_string(),
                name: captures[2].to_string(),
            },
            None => Command::Invalid(SyntaxHint::Alias),
        });
    }
    if line == "aliaslist" {
        return Some(Command::ListAliases);
    }
    if line == "removealias" {
        return Some(Command::Invalid(SyntaxHint::RemoveAlias));
    }
    if let Some(rest) = line.strip_prefix("removealias ") {
        let name = rest.trim();
        return Some(if name.is_empty() {
            Command::Invalid(SyntaxHint::RemoveAlias)
        } else {
            Command::RemoveAlias {
                name: name.to_string(),
            }
        });
    }
    None
}

fn recognize_data(line: &str, _session: &Session) -> Option<Command> {
    if line == "categories" || line == "cats" {
        return Some(Command::ListCategories);
    }
    if line.starts_with("addcat") {
        return Some(match quoted_or_bare(addcat_pattern(), line) {
            Some(name) => Command::CreateCategory { name },
            None => Command::Invalid(SyntaxHint::AddCat),
        });
    }
    if line.starts_with("removecat") {
        return Some(match quoted_or_bare(removecat_pattern(), line) {
            Some(name) => Command::DeleteCategory { name },
            None => Command::Invalid(SyntaxHint::RemoveCat),
        });
    }
    if line.starts_with("add") {
        return Some(match add_pattern().captures(line) {
            Some(captures) => Command::AddItem {
                item: captures[1].to_string(),
                category: captures[2].to_string(),
            },
            None => Command::Invalid(SyntaxHint::Add),
        });
    }
    if line.starts_with("remove") {
        if let Some(captures) = remove_id_pattern().captures(line) {
            return Some(Command::RemoveById {
                // Digits too large for usize land safely out of range.
                id: captures[1].parse().unwrap_or(usize::MAX),
                category: captures[2].to_string(),
            });
        }
        if let Some(captures) = remove_name_pattern().captures(line) {
            return Some(Command::RemoveByName {
                item: captures[1].to_string(),
                category: captures[2].to_string(),
            });
        }
        return Some(Command::Invalid(SyntaxHint::Remove));
    }
    None
}

fn recognize_category_display(line: &str, session: &Session) -> Option<Command> {
    session.categories.contains(line).then(|| Command::ShowCategory {
        name: line.to_string(),
    })
}

fn recognize_alias_execution(line: &str, session: &Session) -> Option<Command> {
    session.aliases.get(line).map(|_| Command::OpenAlias {
        name: line.to_string(),
    })
}

fn quoted_or_bare(pattern: &Regex, line: &str) -> Option<String> {
    let captures = pattern.captures(line)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}
