//! Handlers: one per recognized command, each exclusively responsible for
//! its transcript output and state mutation.

use chrono::{Local, Utc};
use std::fs;

use crate::error::MycmdError;
use crate::export::{self, ExportBundle};
use crate::search;
use crate::session::Session;
use crate::url::is_url;

use super::command::{Command, SyntaxHint};
use super::Effect;

pub(super) fn execute(session: &mut Session, raw: &str, command: Command) -> Vec<Effect> {
    // `clear` is the one branch that produces no echo at all.
    if command == Command::Clear {
        session.transcript.clear();
        return Vec::new();
    }

    let prompt = session.config.prompt.clone();
    session.transcript.echo(&prompt, raw);

    match command {
        Command::Clear => unreachable!("handled above"),
        Command::Help => help(session),
        Command::Debug => debug(session),
        Command::Stats => stats(session),
        Command::Uptime => uptime(session),
        Command::Grep { term } => grep(session, &term),
        Command::Quote => {
            session.transcript.push("Fetching quote from web...");
            return vec![Effect::FetchQuote];
        }
        Command::Export { path } => export_bundle(session, path),
        Command::Import { path } => import_bundle(session, path),
        Command::ListCategories => list_categories(session),
        Command::CreateCategory { name } => create_category(session, &name),
        Command::DeleteCategory { name } => delete_category(session, &name),
        Command::AddItem { item, category } => add_item(session, &item, &category),
        Command::RemoveById { id, category } => remove_by_id(session, id, &category),
        Command::RemoveByName { item, category } => remove_by_name(session, &item, &category),
        Command::CreateAlias { url, name } => create_alias(session, &url, &name),
        Command::ListAliases => list_aliases(session),
        Command::RemoveAlias { name } => remove_alias(session, &name),
        Command::ShowCategory { name } => show_category(session, &name),
        Command::OpenAlias { name } => return open_alias(session, &name),
        Command::Invalid(hint) => invalid(session, hint),
    }

    Vec::new()
}

fn help(session: &mut Session) {
    session.help_visible = !session.help_visible;
    let message = if session.help_visible {
        "Help panel shown"
    } else {
        "Help panel hidden"
    };
    session.transcript.push(message);
}

fn debug(session: &mut Session) {
    session.transcript.push("=== DEBUG INFO ===");

    let mut total_bytes = 0usize;
    for key in session.store.keys() {
        let value = session.store.get(&key).unwrap_or_default();
        total_bytes += value.len();
        session.transcript.push(format!("{key}: {value}"));
    }

    let aliases = serde_json::to_string_pretty(&session.aliases).unwrap_or_default();
    session.transcript.push(format!("Aliases: {aliases}"));
    let data = serde_json::to_string_pretty(&session.categories).unwrap_or_default();
    session.transcript.push(format!("Current data state: {data}"));

    session.transcript.push(format!(
        "Total store size: {:.2} KB",
        total_bytes as f64 / 1024.0
    ));
}

fn stats(session: &mut Session) {
    session.transcript.push("=== SESSION STATISTICS ===");
    session
        .transcript
        .push(format!("Uptime: {}", session.stats.format_uptime(Utc::now())));
    session
        .transcript
        .push(format!("Commands executed: {}", session.stats.command_count()));
    session.transcript.push("Most used commands:");

    let top = session.stats.frequency().top(5);
    if top.is_empty() {
        session.transcript.push("  No commands executed yet");
    } else {
        for (command, count) in top {
            session.transcript.push(format!("{command}: {count} times"));
        }
    }
}

fn uptime(session: &mut Session) {
    session.transcript.push(format!(
        "Session uptime: {}",
        session.stats.format_uptime(Utc::now())
    ));
    let started = session
        .stats
        .session_start()
        .with_timezone(&Local)
        .format("%H:%M:%S");
    session.transcript.push(format!("Started: {started}"));
}

fn grep(session: &mut Session, term: &str) {
    if term.is_empty() {
        session.transcript.push("Usage: grep <search_term>");
        session
            .transcript
            .push("Search through all stored data, categories, and aliases");
        return;
    }

    let results = search::grep(term, &session.categories, &session.aliases, &session.history);
    if results.is_empty() {
        session
            .transcript
            .push(format!("No results found for \"{term}\""));
    } else {
        session.transcript.push(format!(
            "Found {} result(s) for \"{term}\":",
            results.len()
        ));
        for line in results {
            session.transcript.push(line);
        }
    }
}

fn export_bundle(session: &mut Session, path: Option<std::path::PathBuf>) {
    let path = path.unwrap_or_else(|| {
        session
            .export_dir
            .join(export::export_file_name(Local::now().date_naive()))
    });
    let bundle = ExportBundle::new(
        Utc::now(),
        session.categories.clone(),
        session.aliases.clone(),
    );

    let written = bundle
        .to_json()
        .and_then(|json| fs::write(&path, json).map_err(Into::into));
    match written {
        Ok(()) => session.transcript.push(format!(
            "Exported {} categories and {} aliases to {}",
            bundle.data.categories.len(),
            bundle.data.aliases.len(),
            path.display()
        )),
        Err(err) => session.transcript.push_error(format!("Export failed: {err}")),
    }
}

fn import_bundle(session: &mut Session, path: Option<std::path::PathBuf>) {
    let Some(path) = path else {
        session.transcript.push("Usage: import <file>");
        return;
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            session
                .transcript
                .push_error(format!("Import failed: {err}"));
            return;
        }
    };

    match ExportBundle::from_json(&raw) {
        Ok(bundle) => {
            let category_count = session.categories.merge(bundle.data.categories);
            let alias_count = session.aliases.merge(bundle.data.aliases);
            session.persist_categories();
            session.persist_aliases();
            session.transcript.push(format!(
                "Imported {} categories and {} aliases from {}",
                category_count,
                alias_count,
                path.display()
            ));
        }
        Err(MycmdError::Validation(message)) => {
            session
                .transcript
                .push_error(format!("Invalid backup file: {message}"));
        }
        Err(err) => {
            session
                .transcript
                .push_error(format!("Import failed: {err}"));
        }
    }
}

fn list_categories(session: &mut Session) {
    if session.categories.is_empty() {
        session
            .transcript
            .push("No categories found. Use 'add \"item\" in category' to create one.");
        return;
    }
    session.transcript.push("Available categories:");
    let rows: Vec<String> = session
        .categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            format!("{}. {} ({} items)", index + 1, category.name, category.items.len())
        })
        .collect();
    for row in rows {
        session.transcript.push(row);
    }
}

fn create_category(session: &mut Session, name: &str) {
    match session.categories.create(name) {
        Ok(()) => {
            session.persist_categories();
            session
                .transcript
                .push(format!("Created category \"{name}\"."));
        }
        Err(_) => session
            .transcript
            .push(format!("Category \"{name}\" already exists.")),
    }
}

fn delete_category(session: &mut Session, name: &str) {
    match session.categories.delete(name) {
        Ok(()) => {
            session.persist_categories();
            session
                .transcript
                .push(format!("Removed category \"{name}\"."));
        }
        Err(MycmdError::CategoryNotEmpty { count, .. }) => session.transcript.push(format!(
            "Cannot remove \"{name}\": contains {count} items. Remove items first."
        )),
        Err(_) => session
            .transcript
            .push(format!("Category \"{name}\" does not exist.")),
    }
}

fn add_item(session: &mut Session, item: &str, category: &str) {
    match session.categories.add_item(category, item) {
        Ok(added) => {
            session.persist_categories();
            let kind = if added.is_link {
                "(detected as link)"
            } else {
                "(stored as text)"
            };
            session.transcript.push(format!(
                "Added \"{}\" in {category} {kind}",
                added.stored
            ));
        }
        Err(MycmdError::DuplicateItem(stored)) => session.transcript.push(format!(
            "Duplicate detected! \"{stored}\" already exists in {category}"
        )),
        Err(err) => session.transcript.push_error(err.to_string()),
    }
}

fn remove_by_id(session: &mut Session, id: usize, category: &str) {
    match session.categories.remove_by_id(category, id) {
        Ok(removed) => {
            session.persist_categories();
            session.transcript.push(format!(
                "Removed item #{id}: \"{removed}\" from {category}"
            ));
        }
        Err(MycmdError::IdOutOfRange { len, .. }) => session.transcript.push(format!(
            "Invalid ID. {category} has {len} items (use 1-{len})"
        )),
        Err(_) => session
            .transcript
            .push(format!("Category \"{category}\" not found or is empty")),
    }
}

fn remove_by_name(session: &mut Session, item: &str, category: &str) {
    match session.categories.remove_by_name(category, item) {
        Ok(removed) => {
            session.persist_categories();
            session
                .transcript
                .push(format!("Removed \"{removed}\" from {category}"));
        }
        Err(MycmdError::UnknownCategory(_)) => session
            .transcript
            .push(format!("Unknown category: {category}")),
        Err(_) => session
            .transcript
            .push(format!("Item \"{item}\" not found in {category}")),
    }
}

fn create_alias(session: &mut Session, url: &str, name: &str) {
    match session.aliases.create(url, name) {
        Ok(stored) => {
            session.persist_aliases();
            session
                .transcript
                .push(format!("Created alias \"{name}\" for {stored}"));
        }
        Err(_) => session.transcript.push(format!(
            "Alias \"{name}\" already exists. Use removealias to remove it first."
        )),
    }
}

fn list_aliases(session: &mut Session) {
    if session.aliases.is_empty() {
        session.transcript.push("No aliases found.");
        return;
    }
    session
        .transcript
        .push(format!("Available aliases ({}):", session.aliases.len()));
    let rows: Vec<String> = session
        .aliases
        .iter()
        .enumerate()
        .map(|(index, alias)| format!("{}. {} -> {}", index + 1, alias.name, alias.url))
        .collect();
    for row in rows {
        session.transcript.push(row);
    }
}

fn remove_alias(session: &mut Session, name: &str) {
    match session.aliases.remove(name) {
        Ok(url) => {
            session.persist_aliases();
            session
                .transcript
                .push(format!("Removed alias \"{name}\" ({url})"));
        }
        Err(_) => session
            .transcript
            .push(format!("Alias \"{name}\" not found.")),
    }
}

fn show_category(session: &mut Session, name: &str) {
    let Some(category) = session.categories.get(name) else {
        // The recognizer only fires on an existing name.
        return;
    };
    if category.items.is_empty() {
        session
            .transcript
            .push(format!("Category \"{name}\" is empty"));
        return;
    }

    let header = format!("Items in \"{}\" ({}):", name, category.items.len());
    let rows: Vec<String> = category
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = if is_url(item) { "🔗" } else { "📝" };
            format!("{}. {marker} {item}", index + 1)
        })
        .collect();
    session.transcript.push(header);
    for row in rows {
        session.transcript.push(row);
    }
}

fn open_alias(session: &mut Session, name: &str) -> Vec<Effect> {
    let Some(url) = session.aliases.get(name).map(String::from) else {
        return Vec::new();
    };
    session
        .transcript
        .push(format!("Opening {url} in browser..."));
    vec![Effect::OpenUrl(url)]
}

fn invalid(session: &mut Session, hint: SyntaxHint) {
    match hint {
        SyntaxHint::AddCat => session
            .transcript
            .push("Invalid syntax. Use: addcat \"category\" or addcat category"),
        SyntaxHint::RemoveCat => session
            .transcript
            .push("Invalid syntax. Use: removecat \"category\" or removecat category"),
        SyntaxHint::Add => session
            .transcript
            .push("Invalid add syntax. Use: add \"item\" in category"),
        SyntaxHint::Remove => session.transcript.push(
            "Invalid remove syntax. Use: remove \"item\" from category OR remove <number> from category",
        ),
        SyntaxHint::Alias => session
            .transcript
            .push_error("Invalid alias syntax. Use: alias \"url\" as aliasname"),
        SyntaxHint::RemoveAlias => session.transcript.push("Usage: removealias <aliasname>"),
    }
}
