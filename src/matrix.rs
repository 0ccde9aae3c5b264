//! Column-major matrix storage helpers.
//!
//! All matrices in this crate are square `n x n` buffers of f64 stored in
//! column-major order: element `(row, col)` lives at `col * n + row`.

use rand::prelude::*;

/// Calculates the 1D index for a 2D element in a column-major matrix.
///
/// # Arguments
/// * `i` - Row index.
/// * `j` - Column index.
/// * `ld` - Leading dimension (number of rows in the matrix).
#[inline(always)]
pub fn at(i: usize, j: usize, ld: usize) -> usize {
    (j * ld) + i
}

/// Creates an `n x n` column-major matrix of small random integer values.
///
/// Values are drawn uniformly from `0..10` and widened to f64, which keeps
/// intermediate products exactly representable and easy to eyeball in
/// debug output.
pub fn random_matrix(n: usize, rng: &mut StdRng) -> Vec<f64> {
    let mut matrix = vec![0.0; n * n];
    for col in 0..n {
        for row in 0..n {
            matrix[at(row, col, n)] = rng.random_range(0..10) as f64;
        }
    }
    matrix
}

/// Pretty-prints a column-major matrix with a name header.
pub fn print_matrix(matrix: &[f64], rows: usize, cols: usize, name: &str) {
    println!("Matrix {} ({}x{}):", name, rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            print!("{:6.2} ", matrix[at(i, j, rows)]);
        }
        println!();
    }
    println!();
}
