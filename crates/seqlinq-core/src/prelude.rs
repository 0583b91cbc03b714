//! Convenient re-exports for downstream crates.

pub use crate::config::{DuplicateKeyPolicy, QueryConfig};
pub use crate::error::{Error, Result};
pub use crate::key::Hashable;
pub use crate::value::{Value, ValueKey};
