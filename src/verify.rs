//! Element-wise comparison of kernel outputs within an absolute tolerance

use serde::{Deserialize, Serialize};

/// First element where two outputs disagree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Index of the first failing element
    pub index: usize,
    /// Reference value (`NaN` if the reference is shorter)
    pub reference: f64,
    /// Candidate value (`NaN` if the candidate is shorter)
    pub candidate: f64,
    /// Absolute difference (`NaN` when either side is missing or NaN)
    pub diff: f64,
}

/// Outcome of a correctness check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    /// Every element within tolerance
    Passed,
    /// At least one element out of tolerance
    Mismatch(Mismatch),
}

impl Verification {
    /// The single pass/fail flag for the whole vector
    pub fn passed(&self) -> bool {
        matches!(self, Verification::Passed)
    }

    /// Details of the first mismatch, if any
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Verification::Passed => None,
            Verification::Mismatch(m) => Some(m),
        }
    }
}

/// Compare `candidate` against `reference` element by element
///
/// Stops at the first index where `|reference[i] - candidate[i]| > epsilon`.
/// A NaN difference is a mismatch. Vectors of different length mismatch at the
/// first index past the shorter one.
///
/// # Examples
///
/// ```
/// use daxpy_bench::check_correctness;
///
/// let check = check_correctness(&[13.0, 16.0], &[13.0, 16.0 + 1e-12], 1e-9);
/// assert!(check.passed());
///
/// let check = check_correctness(&[13.0, 16.0], &[13.0, 17.0], 1e-9);
/// assert_eq!(check.mismatch().unwrap().index, 1);
/// ```
pub fn check_correctness(reference: &[f64], candidate: &[f64], epsilon: f64) -> Verification {
    for (index, (&r, &c)) in reference.iter().zip(candidate).enumerate() {
        let diff = (r - c).abs();
        if diff.is_nan() || diff > epsilon {
            return Verification::Mismatch(Mismatch {
                index,
                reference: r,
                candidate: c,
                diff,
            });
        }
    }

    if reference.len() != candidate.len() {
        let index = reference.len().min(candidate.len());
        return Verification::Mismatch(Mismatch {
            index,
            reference: reference.get(index).copied().unwrap_or(f64::NAN),
            candidate: candidate.get(index).copied().unwrap_or(f64::NAN),
            diff: f64::NAN,
        });
    }

    Verification::Passed
}
