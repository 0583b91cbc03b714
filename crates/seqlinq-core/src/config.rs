//! Query configuration that downstream crates can serialize/deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What `to_dictionary` does when two elements produce the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Fail with `Error::DuplicateKey`.
    #[default]
    Reject,
    /// Overwrite the earlier value; the key keeps its first position.
    LastWins,
}

impl FromStr for DuplicateKeyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "error" => Ok(DuplicateKeyPolicy::Reject),
            "last_wins" | "last-wins" | "overwrite" => Ok(DuplicateKeyPolicy::LastWins),
            other => Err(Error::InvalidArgument(format!(
                "unknown duplicate key policy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateKeyPolicy::Reject => f.write_str("reject"),
            DuplicateKeyPolicy::LastWins => f.write_str("last_wins"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Collision handling for dictionary materialization.
    pub duplicate_keys: DuplicateKeyPolicy,

    /// Optional cap on the number of elements a buffering operator
    /// (`order_by`, `group_by`, `join`, `reverse`) may hold at once.
    pub max_buffered: Option<usize>,
}

impl QueryConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SEQLINQ_DUPLICATE_KEYS`: `reject` or `last_wins`
    /// - `SEQLINQ_MAX_BUFFERED`: element cap for buffering operators
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SEQLINQ_DUPLICATE_KEYS") {
            if let Ok(v) = s.parse::<DuplicateKeyPolicy>() {
                cfg.duplicate_keys = v;
            }
        }

        if let Ok(s) = std::env::var("SEQLINQ_MAX_BUFFERED") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_buffered = Some(v);
            }
        }

        cfg
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn with_max_buffered(mut self, limit: usize) -> Self {
        self.max_buffered = Some(limit);
        self
    }
}
