//! Foundation types for the scoreboard.
//!
//! Every other scoreboard crate depends on `scoreboard-types`.
//!
//! # Key Types
//!
//! - [`MemberName`]: Validated roster entry (trimmed, non-empty)
//! - [`Record`]: One row of the ledger: a member and their non-negative total
//! - [`Direction`]: Whether a delta is added or subtracted
//! - [`Unit`]: What a total counts (points or minutes) and how it is shown

pub mod direction;
pub mod error;
pub mod record;
pub mod unit;

pub use direction::Direction;
pub use error::TypeError;
pub use record::{sanitize_total, MemberName, Record};
pub use unit::Unit;
