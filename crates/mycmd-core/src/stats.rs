//! Session statistics: start time, command count, per-command frequency.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Per-command usage counts in first-encounter order.
///
/// The order matters: the top-N listing breaks count ties by whichever
/// command was seen first, and that order is kept across a persistence
/// round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFrequency {
    entries: Vec<(String, u64)>,
}

impl CommandFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Increments a command's count, creating the entry at 1 if absent.
    pub fn record(&mut self, command: &str) {
        match self.entries.iter_mut().find(|(cmd, _)| cmd == command) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((command.to_string(), 1)),
        }
    }

    /// The `n` most used commands by descending count, ties resolved by
    /// first-encounter order (the sort is stable).
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(cmd, count)| (cmd.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for CommandFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (command, count) in &self.entries {
            map.serialize_entry(command, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CommandFrequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FrequencyVisitor;

        impl<'de> Visitor<'de> for FrequencyVisitor {
            type Value = CommandFrequency;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of command strings to counts")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, u64>()? {
                    entries.push(entry);
                }
                Ok(CommandFrequency { entries })
            }
        }

        deserializer.deserialize_map(FrequencyVisitor)
    }
}

/// Session-level statistics, reset on logout and re-seeded from persisted
/// values on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    session_start: DateTime<Utc>,
    command_count: u64,
    frequency: CommandFrequency,
}

impl SessionStats {
    /// Creates fresh statistics starting now.
    pub fn new(session_start: DateTime<Utc>) -> Self {
        Self {
            session_start,
            command_count: 0,
            frequency: CommandFrequency::new(),
        }
    }

    /// Re-seeds statistics from persisted values.
    pub fn from_parts(
        session_start: DateTime<Utc>,
        command_count: u64,
        frequency: CommandFrequency,
    ) -> Self {
        Self {
            session_start,
            command_count,
            frequency,
        }
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    pub fn frequency(&self) -> &CommandFrequency {
        &self.frequency
    }

    /// Counts one executed command.
    pub fn record(&mut self, command: &str) {
        self.command_count += 1;
        self.frequency.record(command);
    }

    /// Resets counters and stamps a fresh session start (the logout path).
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.session_start = now;
        self.command_count = 0;
        self.frequency.clear();
    }

    /// Elapsed wall-clock time rendered as `{h}h {m}m {s}s`.
    pub fn format_uptime(&self, now: DateTime<Utc>) -> String {
        let total = (now - self.session_start).num_seconds().max(0);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{hours}h {minutes}m {seconds}s")
    }
}
