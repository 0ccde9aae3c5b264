//! Error types for the GEBP driver.
//!
//! Both failure modes are detected before the loop nest starts, so an `Err`
//! from [`crate::gebp`] guarantees that C has not been mutated.

use std::fmt;

/// Errors that can occur when setting up a GEBP multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GebpError {
    /// The block-size parameters form an invalid tiling.
    InvalidBlockSizes {
        /// Row-panel height of A and C.
        m_c: usize,
        /// Depth-panel width of A, height of B.
        k_c: usize,
        /// Column-panel width of B and C.
        n_r: usize,
        /// Register tile height.
        m_r: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Scratch-buffer allocation failed.
    Allocation {
        /// Number of f64 elements that could not be allocated.
        requested_elems: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for GebpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GebpError::InvalidBlockSizes {
                m_c,
                k_c,
                n_r,
                m_r,
                message,
            } => write!(
                f,
                "Invalid block sizes: {} (m_c: {}, k_c: {}, n_r: {}, m_r: {})",
                message, m_c, k_c, n_r, m_r
            ),
            GebpError::Allocation {
                requested_elems,
                message,
            } => write!(
                f,
                "Scratch allocation failed: {} (requested {} f64 elements)",
                message, requested_elems
            ),
        }
    }
}

impl std::error::Error for GebpError {}

/// Result type alias for GEBP operations.
pub type Result<T> = std::result::Result<T, GebpError>;

/// Creates an invalid-block-sizes error.
pub fn invalid_block_sizes(
    m_c: usize,
    k_c: usize,
    n_r: usize,
    m_r: usize,
    message: impl Into<String>,
) -> GebpError {
    GebpError::InvalidBlockSizes {
        m_c,
        k_c,
        n_r,
        m_r,
        message: message.into(),
    }
}

/// Creates an allocation error.
pub fn allocation_error(requested_elems: usize, message: impl Into<String>) -> GebpError {
    GebpError::Allocation {
        requested_elems,
        message: message.into(),
    }
}
