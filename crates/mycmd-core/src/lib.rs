//! Core domain for the MyCMD terminal: command dispatch, the category and
//! alias stores, session statistics, and the traits its external
//! collaborators (persistence, quote lookup, URL opening) plug into.

pub mod alias;
pub mod category;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod history;
pub mod opener;
pub mod quote;
pub mod search;
pub mod session;
pub mod stats;
pub mod store;
pub mod transcript;
pub mod url;

// Re-export common types
pub use config::Config;
pub use dispatch::{Effect, COMMAND_KEYWORDS};
pub use error::{MycmdError, Result};
pub use session::Session;
