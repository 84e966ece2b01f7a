//! Safe DAXPY entry point with kernel dispatch

#[cfg(target_arch = "x86_64")]
use crate::backends::sse2::Sse2Backend;
use crate::backends::{pointer::PointerBackend, scalar::ScalarBackend, AxpyBackend};
use crate::{DaxpyError, Result};
use serde::{Deserialize, Serialize};

/// Which of the two benchmarked kernels to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// Indexed scalar loop (correctness reference)
    Reference,
    /// Register-resident, pointer-advancing sequence
    Optimized,
}

impl Kernel {
    /// Both kernels, in the order they are timed
    pub const ALL: [Kernel; 2] = [Kernel::Reference, Kernel::Optimized];

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Kernel::Reference => "reference kernel",
            Kernel::Optimized => "optimized kernel",
        }
    }
}

/// Concrete implementation the optimized kernel resolves to on this CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizedBackend {
    /// x86_64 SSE2 scalar-double intrinsics
    Sse2,
    /// Portable pointer walk
    Pointer,
}

impl OptimizedBackend {
    /// Name shown in report headers
    pub fn name(self) -> &'static str {
        match self {
            OptimizedBackend::Sse2 => "x86-64 SSE2",
            OptimizedBackend::Pointer => "portable pointer loop",
        }
    }
}

/// Detect which backend the optimized kernel will use
///
/// On x86_64 SSE2 is part of the baseline, so this is effectively always
/// [`OptimizedBackend::Sse2`] there. Selection is deterministic for a given CPU.
pub fn optimized_backend() -> OptimizedBackend {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("sse2") {
            return OptimizedBackend::Sse2;
        }
    }

    OptimizedBackend::Pointer
}

/// Compute `z[i] = a * x[i] + y[i]` with the chosen kernel
///
/// `z` is fully overwritten; nothing from a previous call is carried over.
/// An empty input performs no writes.
///
/// # Examples
///
/// ```
/// use daxpy_bench::{daxpy, Kernel};
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [11.0, 12.0, 13.0];
/// let mut z = [0.0; 3];
///
/// daxpy(Kernel::Optimized, 2.0, &x, &y, &mut z).unwrap();
/// assert_eq!(z, [13.0, 16.0, 19.0]);
/// ```
///
/// # Errors
///
/// Returns [`DaxpyError::SizeMismatch`] if `y` or `z` differ in length from `x`.
pub fn daxpy(kernel: Kernel, a: f64, x: &[f64], y: &[f64], z: &mut [f64]) -> Result<()> {
    for actual in [y.len(), z.len()] {
        if actual != x.len() {
            return Err(DaxpyError::SizeMismatch {
                expected: x.len(),
                actual,
            });
        }
    }

    // SAFETY: lengths checked above; `z` is a unique borrow so it cannot alias `x` or `y`.
    unsafe {
        match kernel {
            Kernel::Reference => ScalarBackend::daxpy(a, x, y, z),
            Kernel::Optimized => match optimized_backend() {
                #[cfg(target_arch = "x86_64")]
                OptimizedBackend::Sse2 => Sse2Backend::daxpy(a, x, y, z),
                #[cfg(not(target_arch = "x86_64"))]
                OptimizedBackend::Sse2 => PointerBackend::daxpy(a, x, y, z),
                OptimizedBackend::Pointer => PointerBackend::daxpy(a, x, y, z),
            },
        }
    }

    Ok(())
}
