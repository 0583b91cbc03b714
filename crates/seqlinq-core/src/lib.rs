#![forbid(unsafe_code)]
//! seqlinq-core: shared kernel for the seqlinq query engine.
//!
//! This crate contains only *pure* types and the capability traits that the
//! operator and exec crates build on. There is **no iteration logic** here.
//!
//! Crates that use this:
//! - seqlinq-operators: lazy/buffering nodes report failures through `Error`
//!   and key their hash tables with `Hashable::Key`.
//! - seqlinq-exec: the `Query` facade carries a `QueryConfig` and the terminal
//!   materializers honor its duplicate-key policy.

pub mod config;
pub mod error;
pub mod key;
pub mod prelude;
pub mod value;

pub use config::{DuplicateKeyPolicy, QueryConfig};
pub use error::{Error, Result};
pub use key::Hashable;
pub use value::{Value, ValueKey};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
