//! Shared plumbing for the broker crates: logging setup lives here so the
//! binary and the integration tests configure `tracing` the same way.

pub mod utils;
