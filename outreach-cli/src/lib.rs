//! Support library for the `outreach` binary.
//!
//! Exposes the command pipeline and logging set-up so tests can drive the
//! CLI without spawning a process.

pub mod cli;
pub mod logging;
