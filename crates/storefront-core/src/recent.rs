//! # Recent Searches
//!
//! A newest-first, capped log of settled search queries.
//!
//! ## Insertion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record("f") with limit 5                                               │
//! │                                                                         │
//! │   before:  [e, d, c, b, a]                                              │
//! │   push front ──► [f, e, d, c, b, a]                                     │
//! │   truncate   ──► [f, e, d, c, b]        (oldest "a" evicted)            │
//! │                                                                         │
//! │  Duplicates depend on RecentSearchPolicy:                               │
//! │   Deduplicate        record("c") ──► [c, f, e, d, b]                    │
//! │   SkipRepeatOfNewest record("c") ──► [c, f, e, d, c]                    │
//! │                      record("f") on [f, ...] ──► unchanged              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// How a query that is already in the log is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentSearchPolicy {
    /// The log is a set: re-recording moves the entry to the front.
    #[default]
    Deduplicate,

    /// Only an immediate repeat of the newest entry is skipped; an older
    /// equal entry stays and a second copy goes to the front.
    SkipRepeatOfNewest,
}

impl fmt::Display for RecentSearchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecentSearchPolicy::Deduplicate => write!(f, "deduplicate"),
            RecentSearchPolicy::SkipRepeatOfNewest => write!(f, "skip_repeat_of_newest"),
        }
    }
}

impl FromStr for RecentSearchPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deduplicate" | "dedup" => Ok(RecentSearchPolicy::Deduplicate),
            "skip_repeat_of_newest" | "skip-repeat" => Ok(RecentSearchPolicy::SkipRepeatOfNewest),
            other => Err(ValidationError::InvalidFormat {
                field: "recent search policy".to_string(),
                reason: format!("unknown policy '{}'", other),
            }),
        }
    }
}

/// Newest-first recent search log. Persisted as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    pub fn from_entries(entries: Vec<String>) -> Self {
        RecentSearches(entries)
    }

    /// Records a settled query at the front, evicting beyond `limit`.
    ///
    /// Empty queries are ignored. Returns `true` if the log changed.
    pub fn record(&mut self, query: &str, limit: usize, policy: RecentSearchPolicy) -> bool {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return false;
        }

        if self.0.first().map(String::as_str) == Some(query) {
            return false;
        }

        if policy == RecentSearchPolicy::Deduplicate {
            self.0.retain(|q| q != query);
        }

        self.0.insert(0, query.to_string());
        self.0.truncate(limit);
        true
    }

    /// Removes every occurrence of `query`. Returns `true` if any was removed.
    pub fn remove(&mut self, query: &str) -> bool {
        let initial_len = self.0.len();
        self.0.retain(|q| q != query);
        self.0.len() != initial_len
    }

    /// Drops entries beyond `limit` (used after rehydration).
    pub fn truncate(&mut self, limit: usize) {
        self.0.truncate(limit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
