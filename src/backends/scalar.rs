//! Scalar (non-SIMD) backend implementation
//!
//! The reference kernel: a plain indexed loop with standard scalar arithmetic.
//! Every other backend is checked against this one.

use super::AxpyBackend;

/// Scalar backend (portable, indexed loop)
pub struct ScalarBackend;

impl AxpyBackend for ScalarBackend {
    // SAFETY: This function is safe because:
    // 1. All slice accesses are bounds-checked by Rust indexing
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match AxpyBackend trait interface
    unsafe fn daxpy(a: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
        for i in 0..x.len() {
            z[i] = a * x[i] + y[i];
        }
    }
}
