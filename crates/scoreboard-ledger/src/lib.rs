//! Core scoreboard logic.
//!
//! This crate provides:
//! - [`Ledger`] -- the member table, keyed by name, in roster order
//! - [`DeltaRequest`] -- a validated add/subtract request
//! - [`RankedView`] -- the sorted, annotated projection used for display
//! - [`load`] -- fail-open loading that reports where the data came from
//! - [`Session`] -- explicit application state: load, gated apply, persist,
//!   rank, reload, export

pub mod config;
pub mod error;
pub mod ledger;
pub mod load;
pub mod ranking;
pub mod request;
pub mod session;

pub use config::{SessionConfig, WriteFailurePolicy};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use load::{load, try_load, LoadOutcome, LoadSource};
pub use ranking::{RankedEntry, RankedView};
pub use request::DeltaRequest;
pub use session::{AppliedDelta, Session};
