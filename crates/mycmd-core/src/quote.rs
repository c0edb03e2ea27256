//! Quote lookup: the service trait and the offline fallback table.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::OnceLock;

/// A fetched or fallback quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub content: String,
    pub author: String,
    /// True when the quote came from the local table instead of the web.
    pub offline: bool,
}

impl Quote {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            offline: false,
        }
    }

    pub fn offline(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            offline: true,
        }
    }

    /// The transcript lines this quote renders as.
    pub fn transcript_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("\"{}\"", self.content), format!("— {}", self.author)];
        if self.offline {
            lines.push("(offline quote)".to_string());
        }
        lines
    }
}

static LOCAL_QUOTES: OnceLock<Vec<Quote>> = OnceLock::new();

/// The built-in quote table used when every remote source fails.
pub fn local_quotes() -> &'static [Quote] {
    LOCAL_QUOTES.get_or_init(|| {
        vec![
            Quote::offline("The only way to do great work is to love what you do.", "Steve Jobs"),
            Quote::offline("Innovation distinguishes between a leader and a follower.", "Steve Jobs"),
            Quote::offline("Code is like humor. When you have to explain it, it's bad.", "Cory House"),
            Quote::offline("First, solve the problem. Then, write the code.", "John Johnson"),
            Quote::offline("Experience is the name everyone gives to their mistakes.", "Oscar Wilde"),
            Quote::offline("In order to be irreplaceable, one must always be different.", "Coco Chanel"),
            Quote::offline("Java is to JavaScript what car is to Carpet.", "Chris Heilmann"),
            Quote::offline("Knowledge is power.", "Francis Bacon"),
            Quote::offline(
                "Sometimes it pays to stay in bed on Monday, rather than spending the rest of the week debugging Monday's code.",
                "Dan Salomon",
            ),
            Quote::offline(
                "Perfection is achieved not when there is nothing more to add, but when there is nothing left to take away.",
                "Antoine de Saint-Exupéry",
            ),
            Quote::offline("Ruby is rubbish! PHP is phpantastic!", "Nikita Popov"),
            Quote::offline("Code never lies, comments sometimes do.", "Ron Jeffries"),
            Quote::offline("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
            Quote::offline(
                "Programming isn't about what you know; it's about what you can figure out.",
                "Chris Pine",
            ),
            Quote::offline("The best error message is the one that never shows up.", "Thomas Fuchs"),
        ]
    })
}

/// Picks a random entry from the local table.
pub fn random_local_quote() -> Quote {
    let quotes = local_quotes();
    quotes
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| Quote::offline("Knowledge is power.", "Francis Bacon"))
}

/// External collaborator that produces a quote.
///
/// Implementations never fail: when every remote source is unreachable they
/// fall back to the local table, so a response always arrives.
#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn fetch(&self) -> Quote;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_table_is_populated() {
        assert_eq!(local_quotes().len(), 15);
        assert!(local_quotes().iter().all(|q| q.offline));
    }

    #[test]
    fn test_random_local_quote_comes_from_table() {
        let quote = random_local_quote();
        assert!(local_quotes().contains(&quote));
    }

    #[test]
    fn test_transcript_lines_online() {
        let quote = Quote::new("Knowledge is power.", "Francis Bacon");
        assert_eq!(
            quote.transcript_lines(),
            vec!["\"Knowledge is power.\"", "— Francis Bacon"]
        );
    }

    #[test]
    fn test_transcript_lines_offline_marker() {
        let quote = Quote::offline("Knowledge is power.", "Francis Bacon");
        assert_eq!(quote.transcript_lines().last().unwrap(), "(offline quote)");
    }
}
