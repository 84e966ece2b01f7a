//! Error types for DAXPY benchmark operations

use thiserror::Error;

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, DaxpyError>;

/// Errors that can occur while running kernels or the harness
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DaxpyError {
    /// Size mismatch between operands
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Buffer allocation failed for a workload
    #[error("Allocation failed: {len} elements ({bytes} bytes)")]
    AllocationFailed {
        /// Requested element count per buffer
        len: usize,
        /// Total bytes requested across all buffers
        bytes: usize,
    },

    /// Invalid benchmark configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
