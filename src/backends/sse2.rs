//! SSE2 backend implementation (x86_64 baseline SIMD)
//!
//! This backend uses SSE2 *scalar-double* intrinsics. The multiplier is broadcast
//! into an XMM register once, before the loop, and stays resident there. Each
//! element then costs one load of `x`, one multiply, one load-and-add of `y` and
//! one store of `z`, with the three pointers advanced in lockstep instead of
//! recomputing indexed addresses.
//!
//! `mulsd` followed by `addsd` rounds twice, exactly like the scalar reference,
//! so results are bit-identical to [`super::scalar::ScalarBackend`]. A fused
//! multiply-add would round once, so none is emitted.
//!
//! # Safety
//!
//! SSE2 is part of the x86_64 baseline, but the intrinsics are still `unsafe`
//! because they dereference raw pointers.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::AxpyBackend;

/// SSE2 backend (register-resident scalar, pointer-advancing loop)
pub struct Sse2Backend;

impl AxpyBackend for Sse2Backend {
    #[target_feature(enable = "sse2")]
    unsafe fn daxpy(a: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
        let va = _mm_set_sd(a);

        let mut xp = x.as_ptr();
        let mut yp = y.as_ptr();
        let mut zp = z.as_mut_ptr();
        let end = xp.add(x.len());

        while xp < end {
            let vx = _mm_load_sd(xp);
            let vy = _mm_load_sd(yp);

            let vz = _mm_add_sd(_mm_mul_sd(va, vx), vy);
            _mm_store_sd(zp, vz);

            xp = xp.add(1);
            yp = yp.add(1);
            zp = zp.add(1);
        }
    }
}
