//! Logging utilities.
//!
//! The crate itself only talks to the `log` facade. Swallowed asset errors
//! (missing scale variants, sound fallbacks, failed remote fetches) are
//! reported there, so installing a logger is how callers see them.

mod init;

pub use init::{init_logging, LoggingConfig};
