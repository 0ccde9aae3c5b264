//! Packing layer: stages sub-blocks of the full column-major matrices into
//! small contiguous scratch buffers and scatters results back.
//!
//! All four routines clip their reads and writes to the true matrix
//! dimension `n`, so trailing partial panels (when `n` is not a multiple of
//! a block size) never touch memory outside the `n x n` buffers. Clipped
//! destination cells are left untouched; the driver passes the effective
//! block bounds to the micro-kernel so those cells are never consumed.
//!
//! These are pure memory-copy routines with no error returns. Validating
//! the block-size parameters is the driver's responsibility.

use crate::matrix::at;

/// Returns how many of `len` cells starting at `start` fall inside `[0, n)`.
#[inline(always)]
pub fn clipped(len: usize, n: usize, start: usize) -> usize {
    len.min(n.saturating_sub(start))
}

/// Packs the sub-block of A with rows `[i0, i0 + m_c)` and columns
/// `[k0, k0 + k_c)` into `dst`, column-major within the block:
/// `dst[k * m_c + i] = A(i0 + i, k0 + k)`.
///
/// Both the source column run and the destination column run are
/// contiguous, so each column is a single `copy_from_slice`.
pub fn pack_a(dst: &mut [f64], a: &[f64], n: usize, m_c: usize, k_c: usize, i0: usize, k0: usize) {
    let m_eff = clipped(m_c, n, i0);
    let k_eff = clipped(k_c, n, k0);

    for k in 0..k_eff {
        let src = at(i0, k0 + k, n);
        dst[k * m_c..k * m_c + m_eff].copy_from_slice(&a[src..src + m_eff]);
    }
}

/// Packs the sub-sliver of B with rows `[k0, k0 + k_c)` and columns
/// `[j0, j0 + n_r)` into `dst`, with consecutive depth indices contiguous
/// per column: `dst[j * k_c + k] = B(k0 + k, j0 + j)`.
pub fn pack_b(dst: &mut [f64], b: &[f64], n: usize, k_c: usize, n_r: usize, j0: usize, k0: usize) {
    let k_eff = clipped(k_c, n, k0);
    let n_eff = clipped(n_r, n, j0);

    for j in 0..n_eff {
        let src = at(k0, j0 + j, n);
        dst[j * k_c..j * k_c + k_eff].copy_from_slice(&b[src..src + k_eff]);
    }
}

/// Stages the current C sub-block into `dst` (column-major, height `m_c`)
/// so the micro-kernel can accumulate into it in place.
pub fn pack_c(dst: &mut [f64], c: &[f64], n: usize, m_c: usize, n_r: usize, i0: usize, j0: usize) {
    let m_eff = clipped(m_c, n, i0);
    let n_eff = clipped(n_r, n, j0);

    for j in 0..n_eff {
        let src = at(i0, j0 + j, n);
        dst[j * m_c..j * m_c + m_eff].copy_from_slice(&c[src..src + m_eff]);
    }
}

/// Scatters the accumulated C block back into the full matrix, the inverse
/// of [`pack_c`]. The store is clipped to `[0, n)` exactly like the loads,
/// which keeps ragged trailing panels from overwriting neighbouring
/// columns of C.
pub fn unpack_c(src: &[f64], c: &mut [f64], n: usize, m_c: usize, n_r: usize, i0: usize, j0: usize) {
    let m_eff = clipped(m_c, n, i0);
    let n_eff = clipped(n_r, n, j0);

    for j in 0..n_eff {
        let dst = at(i0, j0 + j, n);
        c[dst..dst + m_eff].copy_from_slice(&src[j * m_c..j * m_c + m_eff]);
    }
}
