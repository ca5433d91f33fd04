//! Access gate for scoreboard mutations.
//!
//! Every change to the ledger passes through an [`AccessGate`] first. The
//! gate holds one [`AccessPolicy`]:
//!
//! - [`AccessPolicy::SharedCode`] -- the caller must present the shared
//!   admin code. Comparison is constant-time.
//! - [`AccessPolicy::Disabled`] -- every caller is let through.
//!
//! The code itself never lives in configuration files. [`GateConfig`] names
//! the environment variable it is read from, and a gate that requires a code
//! refuses to start without one.

pub mod config;
pub mod error;
pub mod gate;
pub mod secret;

pub use config::{AuthMode, GateConfig, DEFAULT_CODE_ENV};
pub use error::GateError;
pub use gate::{Access, AccessGate, AccessPolicy};
pub use secret::SharedSecret;
