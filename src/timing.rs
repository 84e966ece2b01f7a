//! Repeated, kernel-only wall-clock timing

use std::time::{Duration, Instant};

use tracing::instrument;

use crate::kernel::{daxpy, Kernel};
use crate::{DaxpyError, Result};
use serde::{Deserialize, Serialize};

/// Aggregate timing of `runs` sequential kernel invocations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Number of timed invocations
    pub runs: usize,
    /// Sum of the per-run durations
    pub total: Duration,
    /// Arithmetic mean per run
    pub mean: Duration,
}

impl Timing {
    /// Mean duration in seconds
    pub fn mean_secs(&self) -> f64 {
        self.mean.as_secs_f64()
    }
}

/// Run `kernel` exactly `runs` times into `z` and average the elapsed time
///
/// Only the kernel call sits inside the measured interval. Every run
/// overwrites `z`; nothing accumulates across runs. Uses the monotonic
/// [`Instant`] clock.
///
/// # Errors
///
/// Returns [`DaxpyError::InvalidConfig`] if `runs` is zero and
/// [`DaxpyError::SizeMismatch`] if the slices differ in length.
#[instrument(level = "debug", skip(x, y, z), fields(n = x.len()))]
pub fn time_kernel(
    kernel: Kernel,
    a: f64,
    x: &[f64],
    y: &[f64],
    z: &mut [f64],
    runs: usize,
) -> Result<Timing> {
    if runs == 0 {
        return Err(DaxpyError::InvalidConfig(
            "runs must be at least 1".to_string(),
        ));
    }

    let mut total = Duration::ZERO;
    for _ in 0..runs {
        let start = Instant::now();
        daxpy(kernel, a, x, y, z)?;
        total += start.elapsed();
    }

    // Duration / u32; runs beyond u32::MAX fall back to f64 division
    let mean = match u32::try_from(runs) {
        Ok(r) => total / r,
        Err(_) => Duration::from_secs_f64(total.as_secs_f64() / runs as f64),
    };

    Ok(Timing { runs, total, mean })
}
