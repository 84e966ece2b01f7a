//! daxpy-bench: DAXPY kernel benchmark
//!
//! Times `Z = A*X + Y` with two kernels that perform identical arithmetic and
//! checks that their outputs agree:
//!
//! 1. **Reference** - an indexed scalar loop
//! 2. **Optimized** - the multiplier held in a register for the whole loop, one
//!    load-multiply-add-store per element, pointers advanced instead of indexed
//!    (SSE2 scalar-double intrinsics on x86_64, a portable pointer walk elsewhere)
//!
//! # Design Principles
//!
//! - **Same arithmetic, different loop shape**: no FMA, no fast-math; outputs are
//!   expected to be bit-identical
//! - **Zero unsafe in public API**: lengths are checked at [`daxpy`], `unsafe` is
//!   isolated in [`backends`]
//! - **Explicit configuration**: run counts, tolerance and sizes travel in a
//!   [`BenchConfig`], never in globals
//!
//! # Quick Start
//!
//! ```rust
//! use daxpy_bench::{daxpy, check_correctness, Kernel};
//!
//! let x = [1.0, 2.0, 3.0];
//! let y = [11.0, 12.0, 13.0];
//! let mut z_ref = [0.0; 3];
//! let mut z_opt = [0.0; 3];
//!
//! daxpy(Kernel::Reference, 2.0, &x, &y, &mut z_ref).unwrap();
//! daxpy(Kernel::Optimized, 2.0, &x, &y, &mut z_opt).unwrap();
//!
//! assert_eq!(z_opt, [13.0, 16.0, 19.0]);
//! assert!(check_correctness(&z_ref, &z_opt, 1e-9).passed());
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod harness;
pub mod kernel;
pub mod report;
pub mod timing;
pub mod verify;
pub mod workload;

pub use config::BenchConfig;
pub use error::{DaxpyError, Result};
pub use harness::{
    run, run_size, run_walkthrough, run_with, BenchEvent, BenchReport, SizeOutcome, SizeReport,
    Walkthrough,
};
pub use kernel::{daxpy, optimized_backend, Kernel, OptimizedBackend};
pub use report::{write_report, OutputFormat, ReportWriter};
pub use timing::{time_kernel, Timing};
pub use verify::{check_correctness, Mismatch, Verification};
pub use workload::Workload;
