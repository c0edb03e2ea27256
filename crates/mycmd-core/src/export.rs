//! Backup bundles: the export/import interchange format.
//!
//! The on-disk shape is `{version, timestamp, data: {categories, aliases}}`.
//! Import merges rather than replaces: same-named keys are overwritten,
//! everything else is left alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::alias::AliasRegistry;
use crate::category::CategoryStore;
use crate::error::{MycmdError, Result};

/// Format version carried in every bundle. Import does not branch on it.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportData {
    pub categories: CategoryStore,
    pub aliases: AliasRegistry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportBundle {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub data: ExportData,
}

impl ExportBundle {
    /// Snapshots the given stores into a bundle stamped `timestamp`.
    pub fn new(
        timestamp: DateTime<Utc>,
        categories: CategoryStore,
        aliases: AliasRegistry,
    ) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            timestamp,
            data: ExportData {
                categories,
                aliases,
            },
        }
    }

    /// Serializes the bundle as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a bundle, validating the top-level shape before the typed
    /// decode so a missing section fails with a named validation error
    /// instead of an opaque parse error.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let data = value
            .get("data")
            .ok_or_else(|| MycmdError::validation("missing data.categories or data.aliases"))?;
        if data.get("categories").is_none_or(|v| !v.is_object())
            || data.get("aliases").is_none_or(|v| !v.is_object())
        {
            return Err(MycmdError::validation(
                "missing data.categories or data.aliases",
            ));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// The dated default export filename, e.g. `mycmd-export-2026-08-04.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("mycmd-export-{}.json", date.format("%Y-%m-%d"))
}
