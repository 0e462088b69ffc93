//! Error types for kernel construction.

use thiserror::Error;

/// Error produced when a diffusion kernel definition is malformed.
///
/// Kernel validation happens at construction, never per pixel: a bad
/// definition fails before any image is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A row after the first does not span the full kernel width.
    #[error(
        "kernel '{name}' row {row} has {len} weights, expected {expected} (2 * half-width + 1)"
    )]
    InconsistentRowWidth {
        name: String,
        row: usize,
        len: usize,
        expected: usize,
    },

    /// The divisor must be a positive integer.
    #[error("kernel '{name}' has non-positive divisor {divisor}")]
    InvalidDivisor { name: String, divisor: i32 },
}
