//! The session context: single owner of all mutable terminal state.
//!
//! Handlers never reach into ambient globals; everything they touch lives
//! here and every confirmed mutation is mirrored into the key-value store.

use chrono::Utc;
use std::path::PathBuf;

use crate::alias::AliasRegistry;
use crate::category::CategoryStore;
use crate::config::Config;
use crate::dispatch::{self, Effect};
use crate::history::CommandHistory;
use crate::quote::Quote;
use crate::stats::SessionStats;
use crate::store::{self, KeyValueStore};
use crate::transcript::Transcript;

/// Everything a running terminal session owns.
pub struct Session {
    pub(crate) config: Config,
    pub(crate) authenticated: bool,
    pub(crate) help_visible: bool,
    pub(crate) stats: SessionStats,
    pub(crate) history: CommandHistory,
    pub(crate) categories: CategoryStore,
    pub(crate) aliases: AliasRegistry,
    pub(crate) transcript: Transcript,
    pub(crate) export_dir: PathBuf,
    pub(crate) store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Builds a session from persisted state, substituting documented
    /// defaults for anything missing or corrupt, and seeds the welcome
    /// banner.
    pub fn new(config: Config, store: Box<dyn KeyValueStore>, export_dir: PathBuf) -> Self {
        let authenticated = store::load_auth(store.as_ref());
        let session_start = store::load_session_start(store.as_ref()).unwrap_or_else(Utc::now);
        let stats = SessionStats::from_parts(
            session_start,
            store::load_command_count(store.as_ref()),
            store::load_frequency(store.as_ref()),
        );

        let mut session = Self {
            authenticated,
            help_visible: authenticated,
            stats,
            history: store::load_history(store.as_ref()),
            categories: store::load_categories(store.as_ref()),
            aliases: store::load_aliases(store.as_ref()),
            transcript: Transcript::new(),
            export_dir,
            store,
            config,
        };

        let greeting = if session.authenticated {
            "Welcome back, master."
        } else {
            "Enter the secret word to access the terminal..."
        };
        session.transcript.replace(["Welcome to MyCMD!", greeting]);
        session
    }

    /// Processes one submitted line and returns the side effects the shell
    /// must perform.
    pub fn handle_line(&mut self, raw: &str) -> Vec<Effect> {
        dispatch::dispatch(self, raw)
    }

    /// Autocomplete suggestion for the current partial input.
    pub fn suggest(&self, input: &str) -> Option<String> {
        dispatch::suggest(input, self.authenticated)
    }

    /// Appends a quote that resolved after its command returned. This is
    /// the single mutation path late quote results go through.
    pub fn append_quote(&mut self, quote: &Quote) {
        for line in quote.transcript_lines() {
            self.transcript.push(line);
        }
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// The authenticated prompt text.
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Releases the underlying store, e.g. to rebuild a session against it.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    // Mirror helpers, called by handlers after each confirmed mutation.

    pub(crate) fn persist_categories(&mut self) {
        store::persist_categories(self.store.as_mut(), &self.categories);
    }

    pub(crate) fn persist_aliases(&mut self) {
        store::persist_aliases(self.store.as_mut(), &self.aliases);
    }

    pub(crate) fn persist_history(&mut self) {
        store::persist_history(self.store.as_mut(), &self.history);
    }

    pub(crate) fn persist_stats_counters(&mut self) {
        store::persist_command_count(self.store.as_mut(), self.stats.command_count());
        store::persist_frequency(self.store.as_mut(), self.stats.frequency());
    }
}
