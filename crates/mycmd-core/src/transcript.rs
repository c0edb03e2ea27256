//! The transcript: the append-only sequence of rendered output lines.

/// A single transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Ordinary informational output.
    Output(String),
    /// Error-tagged output, rendered distinctly.
    Error(String),
    /// The echoed `{prompt}{command}` pair preceding a handler's output.
    Echo { prompt: String, command: String },
}

/// Append-only display history. Cleared wholesale by `clear` and replaced
/// by the banner pair on logout. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<Line>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Appends an informational line.
    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Output(text.into()));
    }

    /// Appends an error-tagged line.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Error(text.into()));
    }

    /// Appends the echoed prompt/command pair.
    pub fn echo(&mut self, prompt: &str, command: &str) {
        self.lines.push(Line::Echo {
            prompt: prompt.to_string(),
            command: command.to_string(),
        });
    }

    /// Truncates the transcript to nothing (the `clear` command).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replaces the transcript wholesale with the given banner lines.
    pub fn replace<I>(&mut self, banner: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.lines.clear();
        for line in banner {
            self.lines.push(Line::Output(line.into()));
        }
    }
}
