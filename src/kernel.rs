//! Micro-kernel: multiplies a packed A block by a packed B sliver and
//! accumulates into a packed C block, `c_block += a_block * b_sliver`.
//!
//! The loop order is j (sliver column) -> k (depth) -> i (rows). For each
//! (j, k) pair the scalar `B(k, j)` is broadcast once and swept against the
//! contiguous column `A(.., k)` in [`LANES`]-wide strides with fused
//! multiply-add, accumulating into the contiguous column `C(.., j)`; rows
//! left over below a full vector are finished with scalar `mul_add`. This
//! keeps the inner loop's memory access to A and C sequential and reuses
//! the broadcast B value across the whole sweep.
//!
//! `m_c` and `k_c` are the allocated heights of the packed buffers and act
//! as the strides; `m_eff`, `k_eff` and `n_eff` bound the iteration so that
//! cells the packing layer clipped away at ragged edges are never read.
//!
//! Accumulation is plain IEEE-754 double precision with FMA, so results
//! can differ in the last bit from a non-fused reference sum.

use crate::LANES;

/// Computes `c_block += a_block * b_sliver` over the packed layouts,
/// dispatching to the AVX2 kernel when the CPU supports it.
#[allow(clippy::too_many_arguments)]
pub fn multiply_blocks(
    a_block: &[f64],
    b_sliver: &[f64],
    c_block: &mut [f64],
    m_c: usize,
    k_c: usize,
    m_eff: usize,
    k_eff: usize,
    n_eff: usize,
) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            unsafe {
                multiply_blocks_avx2(a_block, b_sliver, c_block, m_c, k_c, m_eff, k_eff, n_eff)
            };
            return;
        }
    }

    multiply_blocks_scalar(a_block, b_sliver, c_block, m_c, k_c, m_eff, k_eff, n_eff);
}

/// Portable kernel path. The 4-wide chunking mirrors the vector kernel so
/// both paths have identical accumulation order, and gives the compiler an
/// obvious auto-vectorization target.
#[allow(clippy::too_many_arguments)]
pub fn multiply_blocks_scalar(
    a_block: &[f64],
    b_sliver: &[f64],
    c_block: &mut [f64],
    m_c: usize,
    k_c: usize,
    m_eff: usize,
    k_eff: usize,
    n_eff: usize,
) {
    debug_assert!(m_eff <= m_c && k_eff <= k_c);

    for j in 0..n_eff {
        for k in 0..k_eff {
            let b_val = b_sliver[j * k_c + k];
            let a_col = &a_block[k * m_c..k * m_c + m_eff];
            let c_col = &mut c_block[j * m_c..j * m_c + m_eff];

            let mut c_chunks = c_col.chunks_exact_mut(LANES);
            let mut a_chunks = a_col.chunks_exact(LANES);
            for (c4, a4) in (&mut c_chunks).zip(&mut a_chunks) {
                for lane in 0..LANES {
                    c4[lane] = a4[lane].mul_add(b_val, c4[lane]);
                }
            }
            for (c, a) in c_chunks
                .into_remainder()
                .iter_mut()
                .zip(a_chunks.remainder())
            {
                *c = a.mul_add(b_val, *c);
            }
        }
    }
}

/// AVX2 kernel path: one 256-bit register holds four f64 lanes, so each
/// inner step is a single fused multiply-add over a 4-element run of the A
/// and C columns.
///
/// # Safety
///
/// The caller must ensure that:
/// - the CPU supports the `avx2` and `fma` features,
/// - `a_block` holds at least `k_eff` columns of stride `m_c`, `b_sliver`
///   at least `n_eff` columns of stride `k_c`, and `c_block` at least
///   `n_eff` columns of stride `m_c`, each column `m_eff` (resp. `k_eff`)
///   elements long.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[target_feature(enable = "fma")]
#[allow(clippy::too_many_arguments)]
pub unsafe fn multiply_blocks_avx2(
    a_block: &[f64],
    b_sliver: &[f64],
    c_block: &mut [f64],
    m_c: usize,
    k_c: usize,
    m_eff: usize,
    k_eff: usize,
    n_eff: usize,
) {
    use std::arch::x86_64::*;

    debug_assert!(m_eff <= m_c && k_eff <= k_c);

    for j in 0..n_eff {
        for k in 0..k_eff {
            let b_val = *b_sliver.get_unchecked(j * k_c + k);
            let b_vec = _mm256_set1_pd(b_val);

            let a_col = a_block.as_ptr().add(k * m_c);
            let c_col = c_block.as_mut_ptr().add(j * m_c);

            let mut i = 0;
            while i + LANES <= m_eff {
                let a_vec = _mm256_loadu_pd(a_col.add(i));
                let c_vec = _mm256_loadu_pd(c_col.add(i));
                _mm256_storeu_pd(c_col.add(i), _mm256_fmadd_pd(a_vec, b_vec, c_vec));
                i += LANES;
            }
            while i < m_eff {
                *c_col.add(i) = (*a_col.add(i)).mul_add(b_val, *c_col.add(i));
                i += 1;
            }
        }
    }
}
