//! Blocked matrix multiplication using the GEBP (Generalized Block Panel)
//! algorithm. Everything is accessed and stored in column-major order.
//!
//! The multiply `C += A * B` is staged through three scratch buffers sized
//! to the cache hierarchy: an `m_c x k_c` block of A, a `k_c x n_r` sliver
//! of B and an `m_c x n_r` block of C. A micro-kernel accumulates the
//! staged blocks with fused multiply-add over 4-wide f64 lanes, using AVX2
//! intrinsics where available and a scalar path everywhere else.
//!
//! The binary in `src/main.rs` sweeps block-size parameters over a fixed
//! grid, times each run and records GFLOPS, utilization and cache
//! occupancy to a CSV file.

pub mod error;
pub mod gebp;
pub mod kernel;
pub mod matrix;
pub mod packing;
pub mod report;

pub use error::{GebpError, Result};
pub use gebp::gebp;

/// Number of f64 lanes in one 256-bit vector register.
pub const LANES: usize = 4;
