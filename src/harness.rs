//! Benchmark driver: walkthrough, per-size runs, and the full report

use tracing::{debug, info, instrument, warn};

use crate::config::{BenchConfig, DEFAULT_SCALAR};
use crate::kernel::{daxpy, optimized_backend, Kernel, OptimizedBackend};
use crate::timing::{time_kernel, Timing};
use crate::verify::{check_correctness, Verification};
use crate::workload::Workload;
use crate::{DaxpyError, Result};
use serde::{Deserialize, Serialize};

/// How many leading output elements each size report keeps
pub const PREVIEW_LEN: usize = 10;

/// Fixed walkthrough inputs
pub const WALKTHROUGH_X: [f64; 3] = [1.0, 2.0, 3.0];
/// Fixed walkthrough inputs
pub const WALKTHROUGH_Y: [f64; 3] = [11.0, 12.0, 13.0];

/// One `z[i] = a * x[i] + y[i]` line of the walkthrough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkthroughStep {
    /// Element index
    pub index: usize,
    /// `x[i]`
    pub x: f64,
    /// `y[i]`
    pub y: f64,
    /// Expected `z[i]` computed inline
    pub z: f64,
}

/// Human-checkable n=3 demonstration, run once before the benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walkthrough {
    /// Scalar multiplier
    pub scalar: f64,
    /// Input `X`
    pub x: Vec<f64>,
    /// Input `Y`
    pub y: Vec<f64>,
    /// Per-element arithmetic
    pub steps: Vec<WalkthroughStep>,
    /// Reference kernel output
    pub reference: Vec<f64>,
    /// Optimized kernel output
    pub optimized: Vec<f64>,
    /// Cross-kernel check
    pub verification: Verification,
}

/// Timings and correctness for one completed size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    /// Vector length
    pub n: usize,
    /// Reference kernel timing
    pub reference: Timing,
    /// Optimized kernel timing
    pub optimized: Timing,
    /// Cross-kernel check
    pub verification: Verification,
    /// First [`PREVIEW_LEN`] reference outputs
    pub reference_head: Vec<f64>,
    /// First [`PREVIEW_LEN`] optimized outputs
    pub optimized_head: Vec<f64>,
}

impl SizeReport {
    /// `k` such that `n == 2^k`, if `n` is a power of two
    pub fn exponent(&self) -> Option<u32> {
        self.n.is_power_of_two().then(|| self.n.trailing_zeros())
    }

    /// Reference mean over optimized mean; `None` if the optimized mean is zero
    pub fn speedup(&self) -> Option<f64> {
        let opt = self.optimized.mean_secs();
        (opt > 0.0).then(|| self.reference.mean_secs() / opt)
    }
}

/// What happened for one configured size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SizeOutcome {
    /// Both kernels were timed and compared
    Completed(SizeReport),
    /// Buffers could not be allocated; the size was skipped
    AllocationFailed {
        /// Requested element count per buffer
        len: usize,
        /// Total bytes requested
        bytes: usize,
    },
}

impl SizeOutcome {
    /// Vector length this outcome refers to
    pub fn size(&self) -> usize {
        match self {
            SizeOutcome::Completed(report) => report.n,
            SizeOutcome::AllocationFailed { len, .. } => *len,
        }
    }

    /// Whether the size completed and both kernels agreed
    pub fn passed(&self) -> bool {
        matches!(self, SizeOutcome::Completed(r) if r.verification.passed())
    }
}

/// Everything a run produced, ready for [`crate::report::write_report`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    /// Configuration the run used
    pub config: BenchConfig,
    /// Backend behind the optimized kernel
    pub optimized_backend: OptimizedBackend,
    /// Walkthrough result, if enabled
    pub walkthrough: Option<Walkthrough>,
    /// One entry per configured size, in order
    pub sizes: Vec<SizeOutcome>,
}

impl BenchReport {
    /// True if the walkthrough and every size passed
    pub fn all_passed(&self) -> bool {
        self.walkthrough
            .as_ref()
            .map_or(true, |w| w.verification.passed())
            && self.sizes.iter().all(SizeOutcome::passed)
    }
}

/// Run the fixed n=3 example with both kernels
///
/// The example always uses `A = 2.0` so its expected output stays
/// `13, 16, 19` whatever scalar the benchmark itself is configured with.
/// Only `config.epsilon` is taken from `config`.
///
/// # Errors
///
/// Propagates kernel errors; with the fixed inputs there are none in practice.
pub fn run_walkthrough(config: &BenchConfig) -> Result<Walkthrough> {
    let a = DEFAULT_SCALAR;
    let x = WALKTHROUGH_X;
    let y = WALKTHROUGH_Y;

    let steps = x
        .iter()
        .zip(&y)
        .enumerate()
        .map(|(index, (&xi, &yi))| WalkthroughStep {
            index,
            x: xi,
            y: yi,
            z: a * xi + yi,
        })
        .collect();

    let mut reference = vec![0.0; x.len()];
    let mut optimized = vec![0.0; x.len()];
    daxpy(Kernel::Reference, a, &x, &y, &mut reference)?;
    daxpy(Kernel::Optimized, a, &x, &y, &mut optimized)?;

    let verification = check_correctness(&reference, &optimized, config.epsilon);

    Ok(Walkthrough {
        scalar: a,
        x: x.to_vec(),
        y: y.to_vec(),
        steps,
        reference,
        optimized,
        verification,
    })
}

/// Benchmark one vector length
///
/// Allocates the workload, times each kernel `config.runs` times, compares
/// the outputs and keeps the first [`PREVIEW_LEN`] elements of each. The
/// workload is dropped before returning.
///
/// # Errors
///
/// Allocation failure is *not* an error: it yields
/// [`SizeOutcome::AllocationFailed`]. Other errors (zero runs) propagate.
#[instrument(level = "debug", skip(config), fields(runs = config.runs))]
pub fn run_size(config: &BenchConfig, n: usize) -> Result<SizeOutcome> {
    let workload = match Workload::allocate(n) {
        Ok(w) => w,
        Err(DaxpyError::AllocationFailed { len, bytes }) => {
            warn!(len, bytes, "allocation failed, skipping size");
            return Ok(SizeOutcome::AllocationFailed { len, bytes });
        }
        Err(e) => return Err(e),
    };

    let Workload {
        x,
        y,
        mut z_ref,
        mut z_opt,
    } = workload;
    let a = config.scalar;
    let reference = time_kernel(Kernel::Reference, a, &x, &y, &mut z_ref, config.runs)?;
    let optimized = time_kernel(Kernel::Optimized, a, &x, &y, &mut z_opt, config.runs)?;

    let verification = check_correctness(&z_ref, &z_opt, config.epsilon);
    if let Some(m) = verification.mismatch() {
        warn!(
            n,
            index = m.index,
            reference = m.reference,
            candidate = m.candidate,
            "kernel outputs disagree"
        );
    }

    debug!(
        n,
        reference_secs = reference.mean_secs(),
        optimized_secs = optimized.mean_secs(),
        passed = verification.passed(),
        "size complete"
    );

    let head = |v: &[f64]| v[..v.len().min(PREVIEW_LEN)].to_vec();

    Ok(SizeOutcome::Completed(SizeReport {
        n,
        reference,
        optimized,
        verification,
        reference_head: head(&z_ref),
        optimized_head: head(&z_opt),
    }))
}

/// One step of a run, handed to the caller as soon as it is available
///
/// Serializes with an `event` tag so a stream of events reads as JSON Lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BenchEvent<'a> {
    /// Configuration validated, nothing allocated yet
    Started {
        /// Backend behind the optimized kernel
        optimized_backend: OptimizedBackend,
        /// Configuration the run uses
        config: &'a BenchConfig,
    },
    /// The n=3 walkthrough finished
    Walkthrough(&'a Walkthrough),
    /// One configured size finished or was skipped
    Size(&'a SizeOutcome),
    /// Every size has been handled
    Finished {
        /// Same as [`BenchReport::all_passed`]
        all_passed: bool,
    },
}

/// Run the walkthrough (if enabled) and every configured size in order
///
/// A size that cannot be allocated is recorded and skipped; the remaining
/// sizes still run. A failed correctness check is recorded, not raised.
///
/// # Errors
///
/// Returns [`DaxpyError::InvalidConfig`] if `config` does not validate.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    run_with(config, |_| Ok(()))
}

/// [`run`], reporting each step to `on_event` before starting the next
///
/// Each size's outcome is delivered before the next size allocates, so a
/// caller that writes events out keeps the results of earlier sizes even if
/// the process dies on a later one.
///
/// # Errors
///
/// Returns [`DaxpyError::InvalidConfig`] (converted into `E`) if `config` does
/// not validate, or the first error `on_event` returns. No further sizes run
/// after an error.
pub fn run_with<E, F>(
    config: &BenchConfig,
    mut on_event: F,
) -> std::result::Result<BenchReport, E>
where
    E: From<DaxpyError>,
    F: FnMut(BenchEvent<'_>) -> std::result::Result<(), E>,
{
    config.validate()?;

    let backend = optimized_backend();
    info!(backend = backend.name(), sizes = ?config.sizes, "starting benchmark");
    on_event(BenchEvent::Started {
        optimized_backend: backend,
        config,
    })?;

    let walkthrough = if config.walkthrough {
        let w = run_walkthrough(config)?;
        on_event(BenchEvent::Walkthrough(&w))?;
        Some(w)
    } else {
        None
    };

    let mut sizes = Vec::with_capacity(config.sizes.len());
    for &n in &config.sizes {
        let outcome = run_size(config, n)?;
        on_event(BenchEvent::Size(&outcome))?;
        sizes.push(outcome);
    }

    let report = BenchReport {
        config: config.clone(),
        optimized_backend: backend,
        walkthrough,
        sizes,
    };
    on_event(BenchEvent::Finished {
        all_passed: report.all_passed(),
    })?;

    Ok(report)
}
