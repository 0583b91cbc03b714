//! Ordering operators: multi-key stable `order_by` and `reverse`.

pub mod key;
pub mod order;
pub mod reverse;

pub use key::{KeyLevel, NaturalLevel, SortKeyChain, SortLevel};
pub use order::OrderBy;
pub use reverse::Reverse;
