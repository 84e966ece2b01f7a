//! Benchmark configuration

use crate::{DaxpyError, Result};
use serde::{Deserialize, Serialize};

/// Timed repetitions per kernel per size
pub const DEFAULT_RUNS: usize = 30;

/// Absolute tolerance for the cross-kernel comparison
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Scalar multiplier `A`
pub const DEFAULT_SCALAR: f64 = 2.0;

/// Tested vector lengths: 2^20, 2^24, 2^28
pub const DEFAULT_SIZES: [usize; 3] = [1 << 20, 1 << 24, 1 << 28];

/// `2^k` as a vector length
///
/// # Errors
///
/// Returns [`DaxpyError::InvalidConfig`] if the exponent does not fit in `usize`.
pub fn size_from_exponent(k: u32) -> Result<usize> {
    1usize
        .checked_shl(k)
        .ok_or_else(|| DaxpyError::InvalidConfig(format!("size exponent {k} overflows usize")))
}

/// Everything the harness needs, passed in explicitly
///
/// # Examples
///
/// ```
/// use daxpy_bench::BenchConfig;
///
/// let config = BenchConfig::default();
/// assert_eq!(config.runs, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Timed repetitions per kernel per size
    pub runs: usize,
    /// Absolute tolerance for the correctness check
    pub epsilon: f64,
    /// Scalar multiplier `A`
    pub scalar: f64,
    /// Vector lengths to benchmark, in order
    pub sizes: Vec<usize>,
    /// Run the fixed n=3 walkthrough before the benchmark
    pub walkthrough: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            epsilon: DEFAULT_EPSILON,
            scalar: DEFAULT_SCALAR,
            sizes: DEFAULT_SIZES.to_vec(),
            walkthrough: true,
        }
    }
}

impl BenchConfig {
    /// Replace the size list with `2^k` for each exponent
    ///
    /// # Errors
    ///
    /// Returns [`DaxpyError::InvalidConfig`] if an exponent does not fit in `usize`.
    pub fn with_size_exponents(mut self, exponents: &[u32]) -> Result<Self> {
        self.sizes = exponents
            .iter()
            .map(|&k| size_from_exponent(k))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// Check the configuration before any buffer is allocated
    ///
    /// # Errors
    ///
    /// Returns [`DaxpyError::InvalidConfig`] for zero runs, a negative or NaN
    /// epsilon, a non-finite scalar, an empty size list, or a size whose input
    /// generator would overflow.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(DaxpyError::InvalidConfig(
                "runs must be at least 1".to_string(),
            ));
        }
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(DaxpyError::InvalidConfig(format!(
                "epsilon must be a non-negative number, got {}",
                self.epsilon
            )));
        }
        if !self.scalar.is_finite() {
            return Err(DaxpyError::InvalidConfig(format!(
                "scalar must be finite, got {}",
                self.scalar
            )));
        }
        if self.sizes.is_empty() {
            return Err(DaxpyError::InvalidConfig(
                "at least one vector size is required".to_string(),
            ));
        }
        if let Some(&n) = self.sizes.iter().find(|&&n| n > usize::MAX / 7) {
            return Err(DaxpyError::InvalidConfig(format!(
                "vector size {n} is too large"
            )));
        }
        Ok(())
    }
}
