//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use outreach_core::OutreachError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic survey generation failed.
    #[error("synthetic survey generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// A pipeline stage rejected its input.
    #[error("pipeline stage failed: {0}")]
    Core(#[from] OutreachError),
}
