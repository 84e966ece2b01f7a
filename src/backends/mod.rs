//! Backend implementations of the DAXPY kernel
//!
//! Each backend computes `z[i] = a * x[i] + y[i]` over full slices. They differ
//! only in how the loop is expressed, never in the arithmetic: every backend
//! performs one IEEE-754 multiply followed by one add per element (no FMA), so
//! all of them produce bit-identical output.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The public
//! entry point in [`crate::kernel`] checks lengths before dispatching here.
//!
//! # Backends
//!
//! - `scalar`: Indexed loop, the correctness reference
//! - `sse2`: x86_64 scalar-double SSE2 sequence with the multiplier held in a register
//! - `pointer`: Portable pointer-walking loop for targets without SSE2

pub mod pointer;
pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

/// Backend trait for the DAXPY operation
///
/// # Safety
///
/// Implementations may use raw pointers and SIMD intrinsics. Callers must ensure:
/// - `x`, `y` and `z` have the same length
/// - `z` does not overlap `x` or `y` (guaranteed by the borrow checker for slices)
pub trait AxpyBackend {
    /// DAXPY: z[i] = a * x[i] + y[i]
    ///
    /// # Safety
    ///
    /// - `x`, `y` and `z` must have the same length
    unsafe fn daxpy(a: f64, x: &[f64], y: &[f64], z: &mut [f64]);
}
