//! Blocking driver for the GEBP (Generalized Block Panel) algorithm.
//!
//! The driver breaks the `n x n` matrices into blocks that fit into the L1
//! and L2 caches and walks them with three nested loops, outermost to
//! innermost:
//!
//! 1. `i_block` in strides of `m_c`: which rows of A and C are resident.
//! 2. `k_block` in strides of `k_c`: which columns of A / rows of B are
//!    summed in this pass. The A block for the current `(i_block, k_block)`
//!    pair is packed once here and reused across the whole inner loop,
//!    which amortizes the `O(m_c * k_c)` packing cost over `n / n_r`
//!    column panels.
//! 3. `j_block` in strides of `n_r`: packs the B sliver and the C block for
//!    this column panel, runs the micro-kernel and scatters the updated C
//!    block back.
//!
//! The algorithm is stateless between calls and keeps no shared mutable
//! state beyond the scratch buffers, which are owned by one in-flight call.

use crate::error::{allocation_error, invalid_block_sizes, Result};
use crate::kernel::multiply_blocks;
use crate::packing::{clipped, pack_a, pack_b, pack_c, unpack_c};

/// Checks the block-size parameters before any work begins.
///
/// All four sizes must be nonzero, `m_r` must not exceed `k_c`, and `m_r`
/// must not equal `m_c / 2`; those combinations produce an invalid tiling
/// and are a caller error, not a silent miscomputation.
pub fn validate_block_sizes(m_c: usize, k_c: usize, n_r: usize, m_r: usize) -> Result<()> {
    if m_c == 0 || k_c == 0 || n_r == 0 || m_r == 0 {
        return Err(invalid_block_sizes(
            m_c,
            k_c,
            n_r,
            m_r,
            "block sizes must be positive",
        ));
    }
    if m_r > k_c {
        return Err(invalid_block_sizes(
            m_c,
            k_c,
            n_r,
            m_r,
            "m_r cannot exceed k_c",
        ));
    }
    if m_r == m_c / 2 {
        return Err(invalid_block_sizes(
            m_c,
            k_c,
            n_r,
            m_r,
            "m_r cannot equal m_c / 2",
        ));
    }
    Ok(())
}

/// Fallibly allocates one zeroed scratch buffer of `len` f64 elements.
fn alloc_scratch(len: usize) -> Result<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| allocation_error(len, e.to_string()))?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

/// Performs `C += A * B` in place over column-major `n x n` matrices,
/// using the block parameters to control memory traffic.
///
/// * `m_c` - rows of A and C processed at one time (row-panel height).
/// * `k_c` - columns of A / rows of B processed at one time (panel depth).
/// * `n_r` - columns of B and C processed at one time (column-panel width).
/// * `m_r` - register tile height. Only constrains the configuration; the
///   micro-kernel sweeps rows in [`crate::LANES`]-wide strides.
///
/// Results are added into the existing contents of C, so calling twice on
/// the same C contributes the product twice.
///
/// # Errors
///
/// Returns [`crate::GebpError::InvalidBlockSizes`] for a rejected parameter
/// combination and [`crate::GebpError::Allocation`] if a scratch buffer
/// cannot be allocated. In both cases C is untouched.
///
/// # Panics
///
/// Panics if any slice is shorter than `n * n` elements.
#[allow(clippy::too_many_arguments)]
pub fn gebp(
    n: usize,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    m_c: usize,
    k_c: usize,
    n_r: usize,
    m_r: usize,
) -> Result<()> {
    validate_block_sizes(m_c, k_c, n_r, m_r)?;

    assert!(a.len() >= n * n, "A: expected {}x{} elements", n, n);
    assert!(b.len() >= n * n, "B: expected {}x{} elements", n, n);
    assert!(c.len() >= n * n, "C: expected {}x{} elements", n, n);

    if n == 0 {
        return Ok(());
    }

    // All three scratch buffers are allocated up front so that an
    // allocation failure surfaces before C is mutated. They are reused
    // across every panel iteration of this call.
    let mut a_block = alloc_scratch(m_c * k_c)?;
    let mut b_sliver = alloc_scratch(k_c * n_r)?;
    let mut c_block = alloc_scratch(m_c * n_r)?;

    for i_block in (0..n).step_by(m_c) {
        let m_eff = clipped(m_c, n, i_block);

        for k_block in (0..n).step_by(k_c) {
            let k_eff = clipped(k_c, n, k_block);
            pack_a(&mut a_block, a, n, m_c, k_c, i_block, k_block);

            for j_block in (0..n).step_by(n_r) {
                let n_eff = clipped(n_r, n, j_block);

                pack_b(&mut b_sliver, b, n, k_c, n_r, j_block, k_block);
                pack_c(&mut c_block, c, n, m_c, n_r, i_block, j_block);
                multiply_blocks(
                    &a_block, &b_sliver, &mut c_block, m_c, k_c, m_eff, k_eff, n_eff,
                );
                unpack_c(&c_block, c, n, m_c, n_r, i_block, j_block);
            }
        }
    }

    Ok(())
}
