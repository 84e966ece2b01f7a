//! Per-size buffer ownership and deterministic input generation

use crate::{DaxpyError, Result};

/// Input value for `x[i]`: `(i mod 1000) * 0.001`
#[inline]
pub fn x_value(i: usize) -> f64 {
    (i % 1000) as f64 * 0.001
}

/// Input value for `y[i]`: `((i * 7) mod 1000) * 0.002`
///
/// Callers keep `i <= usize::MAX / 7`; `BenchConfig::validate` enforces this
/// for every benchmarked size.
#[inline]
pub fn y_value(i: usize) -> f64 {
    ((i * 7) % 1000) as f64 * 0.002
}

/// The four buffers for one tested size
///
/// Allocated once per size and reused by every timed run. Each output buffer
/// belongs to exactly one kernel.
#[derive(Debug)]
pub struct Workload {
    /// Input `X`
    pub x: Vec<f64>,
    /// Input `Y`
    pub y: Vec<f64>,
    /// Output of the reference kernel
    pub z_ref: Vec<f64>,
    /// Output of the optimized kernel
    pub z_opt: Vec<f64>,
}

impl Workload {
    /// Allocate all four buffers and fill the inputs
    ///
    /// Checks the request against the memory the OS reports as available
    /// before touching any page, then uses fallible allocation. Linux
    /// overcommits, so a successful reservation alone does not mean the pages
    /// can be backed; without the pre-check an oversized run is killed rather
    /// than reported. Outputs start zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`DaxpyError::AllocationFailed`] if the request exceeds available
    /// memory or any buffer cannot be reserved.
    pub fn allocate(len: usize) -> Result<Self> {
        Self::allocate_within(len, available_memory_bytes())
    }

    /// [`Workload::allocate`] against an explicit memory budget
    ///
    /// `None` means the budget is unknown and only the allocator is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`DaxpyError::AllocationFailed`] if the four buffers exceed
    /// `budget` or cannot be reserved.
    pub fn allocate_within(len: usize, budget: Option<u64>) -> Result<Self> {
        let bytes = Self::bytes_for(len);
        let alloc_err = || DaxpyError::AllocationFailed { len, bytes };

        if let Some(available) = budget {
            if bytes as u64 > available {
                return Err(alloc_err());
            }
        }

        let mut x = try_with_capacity(len).ok_or_else(alloc_err)?;
        let mut y = try_with_capacity(len).ok_or_else(alloc_err)?;
        let mut z_ref = try_with_capacity(len).ok_or_else(alloc_err)?;
        let mut z_opt = try_with_capacity(len).ok_or_else(alloc_err)?;

        x.extend((0..len).map(x_value));
        y.extend((0..len).map(y_value));
        z_ref.resize(len, 0.0);
        z_opt.resize(len, 0.0);

        Ok(Self { x, y, z_ref, z_opt })
    }

    /// Element count per buffer
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the buffers are empty
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Total bytes across the four buffers, saturating on overflow
    pub fn bytes_for(len: usize) -> usize {
        len.saturating_mul(std::mem::size_of::<f64>())
            .saturating_mul(4)
    }
}

fn try_with_capacity(len: usize) -> Option<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).ok()?;
    Some(v)
}

/// Bytes the OS reports as available for new allocations
///
/// Reads `MemAvailable` from `/proc/meminfo`. Returns `None` where that file
/// does not exist or cannot be parsed.
pub fn available_memory_bytes() -> Option<u64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_mem_available(&meminfo)
}

/// Extract `MemAvailable` (reported in kB) from `/proc/meminfo` text, in bytes
pub fn parse_mem_available(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|line| line.starts_with("MemAvailable:"))?
        .split_whitespace()
        .nth(1)?
        .parse::<u64>()
        .ok()?
        .checked_mul(1024)
}
