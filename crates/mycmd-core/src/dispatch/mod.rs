//! The command dispatcher state machine.
//!
//! Authentication gate, usage tracking, then an ordered recognizer chain
//! routing each line to exactly one handler.

mod command;
mod complete;
mod handlers;

use chrono::Utc;

use crate::session::Session;
use crate::store;

pub use command::{Command, SyntaxHint};
pub use complete::{suggest, COMMAND_KEYWORDS};

/// A side effect the shell must perform on the core's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the URL in the user's browser.
    OpenUrl(String),
    /// Start the asynchronous quote lookup; its result lines are appended
    /// to the transcript whenever it resolves.
    FetchQuote,
}

/// Processes one submitted line against the session.
pub fn dispatch(session: &mut Session, raw: &str) -> Vec<Effect> {
    let line = raw.trim();
    if line.is_empty() {
        return Vec::new();
    }

    if !session.authenticated {
        if line == session.config.secret_word {
            login(session);
        } else {
            session
                .transcript
                .push("This is not yours, leave it at once!");
        }
        return Vec::new();
    }

    // The secret word is never recorded, even when already authenticated.
    if line != session.config.secret_word {
        if session.history.push(line) {
            session.persist_history();
        }
        session.stats.record(line);
        session.persist_stats_counters();
    }

    if line == "logout" {
        logout(session);
        return Vec::new();
    }

    for recognize in command::RECOGNIZERS {
        if let Some(parsed) = recognize(line, session) {
            return handlers::execute(session, line, parsed);
        }
    }

    let prompt = session.config.prompt.clone();
    session.transcript.echo(&prompt, line);
    session
        .transcript
        .push_error(format!("Unknown command: {line}. Type 'help' for options."));
    Vec::new()
}

fn login(session: &mut Session) {
    session.authenticated = true;
    session.help_visible = true;
    store::persist_auth(session.store.as_mut(), true);
    if store::load_session_start(session.store.as_ref()).is_none() {
        store::persist_session_start(session.store.as_mut(), session.stats.session_start());
    }
    session.transcript.push("Access granted. Welcome, master.");
    session
        .transcript
        .push("Type 'help' to see available commands.");
}

fn logout(session: &mut Session) {
    session.authenticated = false;
    session.help_visible = false;

    session.stats.reset(Utc::now());
    store::persist_session_start(session.store.as_mut(), session.stats.session_start());
    session.persist_stats_counters();

    session.history.clear();
    session.persist_history();

    store::persist_auth(session.store.as_mut(), false);

    session.transcript.replace([
        "Welcome to MyCMD!",
        "Session terminated. Enter the secret word to access the terminal...",
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::quote::Quote;
    use crate::store::{self, KeyValueStore, MemoryStore};
    use crate::transcript::Line;

    fn new_session() -> Session {
        Session::new(
            Config::default(),
            Box::new(MemoryStore::new()),
            std::env::temp_dir(),
        )
    }

    fn authed_session() -> Session {
        let mut session = new_session();
        session.handle_line("zoro");
        session
    }

    /// All transcript lines flattened to plain text, for containment checks.
    fn text_of(session: &Session) -> Vec<String> {
        session
            .transcript()
            .lines()
            .iter()
            .map(|line| match line {
                Line::Output(text) | Line::Error(text) => text.clone(),
                Line::Echo { prompt, command } => format!("{prompt}{command}"),
            })
            .collect()
    }

    #[test]
    fn test_login_grants_access_and_persists_flag() {
        let mut session = new_session();
        assert!(!session.authenticated());

        session.handle_line("zoro");
        assert!(session.authenticated());
        assert!(text_of(&session)
            .iter()
            .any(|l| l.contains("Access granted")));
        assert!(store::load_auth(session.store.as_ref()));
    }

    #[test]
    fn test_wrong_secret_is_rejected_without_state_change() {
        let mut session = new_session();
        session.handle_line("luffy");
        assert!(!session.authenticated());
        assert_eq!(
            text_of(&session).last().unwrap(),
            "This is not yours, leave it at once!"
        );
        assert!(!store::load_auth(session.store.as_ref()));
    }

    #[test]
    fn test_secret_never_enters_history_or_stats() {
        let mut session = authed_session();
        session.handle_line("zoro");
        session.handle_line("stats");

        assert!(session.history().iter().all(|cmd| cmd != "zoro"));
        // Only "stats" was counted.
        assert_eq!(session.stats().command_count(), 1);
    }

    #[test]
    fn test_add_link_detects_and_normalizes() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");

        let text = text_of(&session);
        let added = text.last().unwrap();
        assert!(added.contains("Added \"https://github.com\" in links"));
        assert!(added.contains("(detected as link)"));
        assert_eq!(
            session.categories().get("links").unwrap().items,
            vec!["https://github.com"]
        );
    }

    #[test]
    fn test_add_duplicate_reports_and_keeps_one() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("add \"github.com\" in links");

        assert!(text_of(&session)
            .last()
            .unwrap()
            .starts_with("Duplicate detected!"));
        assert_eq!(session.categories().get("links").unwrap().items.len(), 1);
    }

    #[test]
    fn test_add_plain_text_message() {
        let mut session = authed_session();
        session.handle_line("add \"finish the report\" in notes");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("(stored as text)"));
    }

    #[test]
    fn test_remove_then_removecat_succeeds() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("remove 1 from links");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("Removed item #1: \"https://github.com\" from links"));

        session.handle_line("removecat links");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("Removed category \"links\"."));
        assert!(!session.categories().contains("links"));
    }

    #[test]
    fn test_remove_out_of_range_reports_bounds() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("remove 5 from links");
        assert_eq!(
            text_of(&session).last().unwrap(),
            "Invalid ID. links has 1 items (use 1-1)"
        );
        assert_eq!(session.categories().get("links").unwrap().items.len(), 1);
    }

    #[test]
    fn test_removecat_non_empty_fails() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("removecat links");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("contains 1 items. Remove items first."));
        assert!(session.categories().contains("links"));
    }

    #[test]
    fn test_alias_create_open_and_conflict() {
        let mut session = authed_session();
        session.handle_line("alias \"twitter.com\" as tw");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("Created alias \"tw\" for https://twitter.com"));

        let effects = session.handle_line("tw");
        assert_eq!(
            effects,
            vec![Effect::OpenUrl("https://twitter.com".to_string())]
        );
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("Opening https://twitter.com in browser..."));

        session.handle_line("alias \"x.com\" as tw");
        assert!(text_of(&session)
            .last()
            .unwrap()
            .contains("Alias \"tw\" already exists."));
    }

    #[test]
    fn test_category_display_beats_alias_execution() {
        let mut session = authed_session();
        session.handle_line("alias \"twitter.com\" as tw");
        session.handle_line("addcat tw");

        // The category name now shadows the alias.
        let effects = session.handle_line("tw");
        assert!(effects.is_empty());
        assert_eq!(text_of(&session).last().unwrap(), "Category \"tw\" is empty");
    }

    #[test]
    fn test_commands_are_never_shadowed_by_aliases() {
        let mut session = authed_session();
        session.handle_line("alias \"stats.example.com\" as stats");
        let effects = session.handle_line("stats");
        assert!(effects.is_empty());
        assert!(text_of(&session)
            .iter()
            .any(|l| l == "=== SESSION STATISTICS ==="));
    }

    #[test]
    fn test_quote_echoes_then_requests_fetch() {
        let mut session = authed_session();
        let effects = session.handle_line("quote");
        assert_eq!(effects, vec![Effect::FetchQuote]);
        assert_eq!(
            text_of(&session).last().unwrap(),
            "Fetching quote from web..."
        );

        // The late-arriving result appends at the current transcript end.
        session.handle_line("uptime");
        session.append_quote(&Quote::new("Knowledge is power.", "Francis Bacon"));
        assert_eq!(text_of(&session).last().unwrap(), "— Francis Bacon");
    }

    #[test]
    fn test_clear_truncates_without_echo() {
        let mut session = authed_session();
        session.handle_line("stats");
        session.handle_line("clear");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_unknown_command_is_error_tagged() {
        let mut session = authed_session();
        session.handle_line("frobnicate");
        let last = session.transcript().lines().last().unwrap().clone();
        assert_eq!(
            last,
            Line::Error("Unknown command: frobnicate. Type 'help' for options.".to_string())
        );
    }

    #[test]
    fn test_help_toggles_visibility() {
        let mut session = authed_session();
        assert!(session.help_visible());

        session.handle_line("help");
        assert!(!session.help_visible());
        assert_eq!(text_of(&session).last().unwrap(), "Help panel hidden");

        session.handle_line("help");
        assert!(session.help_visible());
        assert_eq!(text_of(&session).last().unwrap(), "Help panel shown");
    }

    #[test]
    fn test_logout_resets_session_but_keeps_content() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("alias \"twitter.com\" as tw");
        session.handle_line("logout");

        assert!(!session.authenticated());
        assert_eq!(session.stats().command_count(), 0);
        assert!(session.history().is_empty());
        assert!(session.categories().contains("links"));
        assert_eq!(session.aliases().get("tw"), Some("https://twitter.com"));
        assert_eq!(
            text_of(&session),
            vec![
                "Welcome to MyCMD!",
                "Session terminated. Enter the secret word to access the terminal...",
            ]
        );
        assert!(!store::load_auth(session.store.as_ref()));
    }

    #[test]
    fn test_consecutive_history_dedup() {
        let mut session = authed_session();
        session.handle_line("stats");
        session.handle_line("stats");
        session.handle_line("uptime");
        session.handle_line("stats");

        let entries: Vec<&str> = session.history().iter().collect();
        assert_eq!(entries, vec!["stats", "uptime", "stats"]);
        // The frequency table still counts every submission.
        assert_eq!(session.stats().command_count(), 4);
    }

    #[test]
    fn test_suggestions_only_while_authenticated() {
        let mut session = new_session();
        assert_eq!(session.suggest("sta"), None);

        session.handle_line("zoro");
        assert_eq!(session.suggest("sta"), Some("ts".to_string()));
        assert_eq!(session.suggest(""), None);
    }

    #[test]
    fn test_grep_empty_term_prints_usage() {
        let mut session = authed_session();
        session.handle_line("grep");
        assert!(text_of(&session)
            .iter()
            .any(|l| l == "Usage: grep <search_term>"));
    }

    #[test]
    fn test_grep_finds_across_stores() {
        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("grep github");

        let text = text_of(&session);
        assert!(text.iter().any(|l| l.starts_with("Found ")));
        assert!(text.iter().any(|l| l == "links[1]: https://github.com"));
    }

    #[test]
    fn test_grep_matches_its_own_history_entry() {
        // The grep line enters history before the search runs, so the term
        // always matches at least its own command.
        let mut session = authed_session();
        session.handle_line("grep zzz");
        let text = text_of(&session);
        assert!(text.iter().any(|l| l == "Found 1 result(s) for \"zzz\":"));
        assert!(text.iter().any(|l| l == "History[1]: grep zzz"));
    }

    #[test]
    fn test_addcat_quoted_takes_precedence() {
        let mut session = authed_session();
        session.handle_line("addcat \"weekend reading\"");
        assert!(session.categories().contains("weekend reading"));

        session.handle_line("addcat projects");
        assert!(session.categories().contains("projects"));
    }

    #[test]
    fn test_addcat_bad_syntax() {
        let mut session = authed_session();
        session.handle_line("addcat");
        assert_eq!(
            text_of(&session).last().unwrap(),
            "Invalid syntax. Use: addcat \"category\" or addcat category"
        );
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut session = authed_session();
        session.handle_line("add \"github.com\" in links");
        session.handle_line("alias \"twitter.com\" as tw");
        session.handle_line(&format!("export {}", path.display()));
        assert!(text_of(&session)
            .last()
            .unwrap()
            .starts_with("Exported 1 categories and 1 aliases"));

        let categories_before = session.categories().clone();
        let aliases_before = session.aliases().clone();

        session.handle_line(&format!("import {}", path.display()));
        assert!(text_of(&session)
            .last()
            .unwrap()
            .starts_with("Imported 1 categories and 1 aliases"));
        assert_eq!(session.categories(), &categories_before);
        assert_eq!(session.aliases(), &aliases_before);
    }

    #[test]
    fn test_import_rejects_bad_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"version": "1.0", "data": {}}"#).unwrap();

        let mut session = authed_session();
        session.handle_line(&format!("import {}", path.display()));
        assert_eq!(
            text_of(&session).last().unwrap(),
            "Invalid backup file: missing data.categories or data.aliases"
        );
    }

    #[test]
    fn test_import_without_path_is_usage_error() {
        let mut session = authed_session();
        session.handle_line("import");
        assert_eq!(text_of(&session).last().unwrap(), "Usage: import <file>");
    }

    #[test]
    fn test_state_survives_reload() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        {
            let mut session = Session::new(
                Config::default(),
                std::mem::replace(&mut store, Box::new(MemoryStore::new())),
                std::env::temp_dir(),
            );
            session.handle_line("zoro");
            session.handle_line("add \"github.com\" in links");
            session.handle_line("alias \"twitter.com\" as tw");
            store = session.into_store();
        }

        let session = Session::new(Config::default(), store, std::env::temp_dir());
        assert!(session.authenticated());
        assert_eq!(
            session.categories().get("links").unwrap().items,
            vec!["https://github.com"]
        );
        assert_eq!(session.aliases().get("tw"), Some("https://twitter.com"));
        assert_eq!(
            text_of(&session),
            vec!["Welcome to MyCMD!", "Welcome back, master."]
        );
    }
}
