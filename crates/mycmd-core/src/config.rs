//! Application configuration.

use serde::{Deserialize, Serialize};

fn default_secret_word() -> String {
    "zoro".to_string()
}

fn default_prompt() -> String {
    "root@mycmd:~$ ".to_string()
}

/// User-tunable settings, loaded from `config.toml` with defaults for
/// anything missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// The secret word gating the authenticated state.
    #[serde(default = "default_secret_word")]
    pub secret_word: String,
    /// The prompt shown (and echoed) while authenticated.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_word: default_secret_word(),
            prompt: default_prompt(),
        }
    }
}
