//! End-to-end correctness of the blocked multiply against a naive
//! triple-loop reference, including ragged panel sizes and the
//! accumulation contract.

use gebp::matrix::{at, random_matrix};
use gebp::packing::{pack_a, pack_b, pack_c, unpack_c};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// C(i, j) += sum_k A(i, k) * B(k, j), column-major.
fn naive_matmul(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for j in 0..n {
        for k in 0..n {
            for i in 0..n {
                c[at(i, j, n)] += a[at(i, k, n)] * b[at(k, j, n)];
            }
        }
    }
}

fn assert_matches_reference(n: usize, m_c: usize, k_c: usize, n_r: usize, m_r: usize) {
    let mut rng = StdRng::seed_from_u64(1234);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    let mut c = random_matrix(n, &mut rng);
    let mut c_ref = c.clone();

    gebp::gebp(n, &a, &b, &mut c, m_c, k_c, n_r, m_r).unwrap();
    naive_matmul(&a, &b, &mut c_ref, n);

    for i in 0..n * n {
        let diff = (c[i] - c_ref[i]).abs();
        let scale = c_ref[i].abs().max(1.0);
        assert!(
            diff / scale < 1e-9,
            "n={} m_c={} k_c={} n_r={} m_r={}: mismatch at {}: got {}, expected {}",
            n,
            m_c,
            k_c,
            n_r,
            m_r,
            i,
            c[i],
            c_ref[i]
        );
    }
}

#[test]
fn matches_reference_when_blocks_divide() {
    assert_matches_reference(64, 16, 16, 8, 16);
    assert_matches_reference(96, 24, 24, 4, 8);
}

#[test]
fn matches_reference_with_ragged_blocks() {
    // None of the block sizes divide the matrix dimension.
    assert_matches_reference(61, 16, 16, 8, 16);
    assert_matches_reference(50, 12, 9, 7, 4);
}

#[test]
fn matches_reference_when_matrix_smaller_than_blocks() {
    // N=5 with 4x4 panels: every panel is partial in at least one
    // dimension and nothing may touch memory outside the 5x5 buffers.
    assert_matches_reference(5, 4, 4, 4, 1);
}

#[test]
fn identity_times_b_is_exactly_b() {
    let n = 4;
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        a[at(i, i, n)] = 1.0;
    }
    let mut rng = StdRng::seed_from_u64(99);
    let b = random_matrix(n, &mut rng);
    let mut c = vec![0.0; n * n];

    gebp::gebp(n, &a, &b, &mut c, 4, 4, 4, 3).unwrap();

    assert_eq!(c, b);
}

#[test]
fn two_calls_accumulate_twice_the_product() {
    let n = 16;
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    let c0 = random_matrix(n, &mut rng);

    let mut product = vec![0.0; n * n];
    naive_matmul(&a, &b, &mut product, n);

    let mut c = c0.clone();
    gebp::gebp(n, &a, &b, &mut c, 8, 8, 4, 8).unwrap();
    gebp::gebp(n, &a, &b, &mut c, 8, 8, 4, 8).unwrap();

    for i in 0..n * n {
        let expected = c0[i] + 2.0 * product[i];
        let diff = (c[i] - expected).abs();
        assert!(
            diff / expected.abs().max(1.0) < 1e-9,
            "accumulation mismatch at {}: got {}, expected {}",
            i,
            c[i],
            expected
        );
    }
}

#[test]
fn rejected_configuration_leaves_c_untouched() {
    let n = 8;
    let mut rng = StdRng::seed_from_u64(17);
    let a = random_matrix(n, &mut rng);
    let b = random_matrix(n, &mut rng);
    let c0 = random_matrix(n, &mut rng);

    // m_r exceeding k_c.
    let mut c = c0.clone();
    assert!(gebp::gebp(n, &a, &b, &mut c, 4, 4, 4, 5).is_err());
    assert_eq!(c, c0);

    // m_r equal to half of m_c.
    let mut c = c0.clone();
    assert!(gebp::gebp(n, &a, &b, &mut c, 8, 8, 4, 4).is_err());
    assert_eq!(c, c0);
}

#[test]
fn packing_round_trip_reproduces_the_sub_block() {
    let n = 9;
    let mut rng = StdRng::seed_from_u64(23);
    let m = random_matrix(n, &mut rng);
    let (m_c, k_c, n_r) = (4, 4, 4);

    // A: pack a ragged block and check every in-range cell.
    let mut a_block = vec![0.0; m_c * k_c];
    pack_a(&mut a_block, &m, n, m_c, k_c, 8, 4);
    for k in 0..k_c.min(n - 4) {
        for i in 0..m_c.min(n - 8) {
            assert_eq!(a_block[k * m_c + i], m[at(8 + i, 4 + k, n)]);
        }
    }

    // B: depth index varies fastest per column.
    let mut b_sliver = vec![0.0; k_c * n_r];
    pack_b(&mut b_sliver, &m, n, k_c, n_r, 4, 8);
    for j in 0..n_r.min(n - 4) {
        for k in 0..k_c.min(n - 8) {
            assert_eq!(b_sliver[j * k_c + k], m[at(8 + k, 4 + j, n)]);
        }
    }

    // C: pack then unpack with no compute in between is the identity.
    let mut c = m.clone();
    let mut c_block = vec![0.0; m_c * n_r];
    pack_c(&mut c_block, &c, n, m_c, n_r, 4, 8);
    unpack_c(&c_block, &mut c, n, m_c, n_r, 4, 8);
    assert_eq!(c, m);
}
