//! History entry representing one completed calculation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry.
    pub id: String,
    /// The expression as typed, with display glyphs.
    pub expression: String,
    /// The formatted result.
    pub result: String,
    /// When the calculation completed.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub(crate) fn new(
        id: String,
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            expression: expression.into(),
            result: result.into(),
            timestamp,
        }
    }

    /// Get the text to place back on the display when reusing this entry.
    pub fn text_for_display(&self) -> &str {
        &self.result
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}
