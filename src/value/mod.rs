//! Typed value model for shelfdb
//!
//! Every stored value is one of eight variants: four scalars (int, string,
//! float, bool) and the four slices of those scalars. The variant carries its
//! payload directly, so a payload that disagrees with its kind cannot be
//! constructed. Kind codes are persisted in the row table and are stable.

mod errors;
mod types;

pub use errors::{ValueError, ValueResult};
pub use types::{Kind, Value};
