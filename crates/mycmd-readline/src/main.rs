use std::borrow::Cow::{self, Owned};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use mycmd_core::dispatch::suggest;
use mycmd_core::opener::UrlOpener;
use mycmd_core::quote::{Quote, QuoteService};
use mycmd_core::transcript::Line;
use mycmd_core::{COMMAND_KEYWORDS, Config, Effect, Session};
use mycmd_infrastructure::{ConfigStorage, FileStore, HttpQuoteService, MycmdPaths, SystemOpener};

/// The prompt shown while the terminal is still locked.
const SECRET_PROMPT: &str = "secret> ";

/// CLI helper for rustyline that provides completion and inline hints over
/// the fixed command keyword list. Nothing is offered while locked.
struct CliHelper {
    authenticated: Arc<AtomicBool>,
}

impl CliHelper {
    fn new(authenticated: Arc<AtomicBool>) -> Self {
        Self { authenticated }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !self.authenticated.load(Ordering::Relaxed) || line.is_empty() {
            return Ok((0, vec![]));
        }

        let candidates: Vec<Pair> = COMMAND_KEYWORDS
            .iter()
            .filter(|keyword| keyword.starts_with(line))
            .map(|keyword| Pair {
                display: keyword.to_string(),
                replacement: keyword.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        suggest(line, self.authenticated.load(Ordering::Relaxed))
    }
}

impl Highlighter for CliHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }
}

impl Validator for CliHelper {}

/// Prints every transcript line appended since the last render and
/// advances the cursor.
fn render_new_lines(session: &Session, rendered: &mut usize) {
    for line in &session.transcript().lines()[*rendered..] {
        match line {
            Line::Echo { prompt, command } => {
                println!("{}", format!("{prompt}{command}").bright_black());
            }
            Line::Output(text) => println!("{}", text.green()),
            Line::Error(text) => println!("{}", text.red()),
        }
    }
    *rendered = session.transcript().len();
}

fn print_help_panel() {
    let panel = [
        "=== MyCMD Commands ===",
        "SYSTEM",
        "  help, clear, logout, debug",
        "CATEGORIES",
        "  categories         - list all",
        "  addcat \"name\"      - create",
        "  removecat \"name\"   - delete",
        "  [category]         - show items",
        "ITEMS",
        "  add \"item\" in [category]",
        "  remove [id] from [category]",
        "  remove \"name\" from [category]",
        "ALIASES",
        "  alias \"url\" as name",
        "  aliaslist",
        "  removealias name",
        "  [alias]            - open target",
        "TOOLS",
        "  stats, uptime, grep <term>, quote",
        "  export [file], import <file>",
    ];
    for line in panel {
        println!("{}", line.cyan());
    }
}

/// The main entry point for the MyCMD readline application.
///
/// Sets up a rustyline-based REPL that:
/// 1. Loads configuration and the persisted session state
/// 2. Provides command completion and inline hints while authenticated
/// 3. Dispatches each line through the core session
/// 4. Performs the returned side effects (URL opening, quote fetches)
/// 5. Folds late-arriving quote results back into the transcript
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ===== Backend Initialization =====
    let config = match ConfigStorage::new() {
        Ok(storage) => storage.load(),
        Err(_) => Config::default(),
    };
    let store = FileStore::default_location()?;
    let export_dir = MycmdPaths::data_dir()?;
    fs::create_dir_all(&export_dir)?;

    let mut session = Session::new(config, Box::new(store), export_dir);

    let quote_service = Arc::new(HttpQuoteService::new());
    let opener = SystemOpener;

    // Channel feeding resolved quotes back into the transcript.
    let (quote_tx, mut quote_rx) = mpsc::channel::<Quote>(8);

    // ===== REPL Setup =====
    let authenticated = Arc::new(AtomicBool::new(session.authenticated()));
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(Arc::clone(&authenticated))));

    // Seed recall history from the persisted business history.
    for entry in session.history().iter() {
        let _ = rl.add_history_entry(entry);
    }

    let mut rendered = 0usize;
    render_new_lines(&session, &mut rendered);

    // ===== Main REPL Loop =====
    loop {
        // Quote results that resolved while idle were already printed by
        // their fetch task; catch the transcript up through the single
        // mutation path before handling the next command.
        while let Ok(quote) = quote_rx.try_recv() {
            session.append_quote(&quote);
            rendered = session.transcript().len();
        }

        let prompt = if session.authenticated() {
            session.prompt().to_string()
        } else {
            SECRET_PROMPT.to_string()
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                let was_help_visible = session.help_visible();
                let effects = session.handle_line(trimmed);

                if session.authenticated() && trimmed != session.config().secret_word {
                    let _ = rl.add_history_entry(trimmed);
                }
                authenticated.store(session.authenticated(), Ordering::Relaxed);

                // A shorter transcript means `clear` or a banner replacement.
                if session.transcript().len() < rendered {
                    print!("\x1B[2J\x1B[1;1H");
                    let _ = io::stdout().flush();
                    rendered = 0;
                }
                render_new_lines(&session, &mut rendered);

                if session.help_visible() && !was_help_visible {
                    print_help_panel();
                }

                for effect in effects {
                    match effect {
                        Effect::OpenUrl(url) => {
                            if let Err(err) = opener.open(&url) {
                                eprintln!("{}", format!("Failed to open {url}: {err}").red());
                            }
                        }
                        Effect::FetchQuote => {
                            let service = Arc::clone(&quote_service);
                            let tx = quote_tx.clone();
                            tokio::spawn(async move {
                                let quote = service.fetch().await;
                                for line in quote.transcript_lines() {
                                    println!("{}", line.green());
                                }
                                let _ = tx.send(quote).await;
                            });
                        }
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
