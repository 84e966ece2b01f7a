//! Portable pointer-walking backend
//!
//! Same instruction shape as the SSE2 backend (multiplier hoisted into a local,
//! one load-multiply-add-store per element, pointers advanced in lockstep) but
//! written with plain `f64` arithmetic so it compiles on every target. The
//! optimized kernel resolves to this backend where SSE2 is unavailable.

use super::AxpyBackend;

/// Pointer-walking backend (portable)
pub struct PointerBackend;

impl AxpyBackend for PointerBackend {
    unsafe fn daxpy(a: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
        let mut xp = x.as_ptr();
        let mut yp = y.as_ptr();
        let mut zp = z.as_mut_ptr();
        let end = xp.add(x.len());

        while xp < end {
            *zp = a * *xp + *yp;

            xp = xp.add(1);
            yp = yp.add(1);
            zp = zp.add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::scalar::ScalarBackend;
    use super::*;

    #[test]
    fn test_pointer_daxpy() {
        let x = [1.0, 2.0, 3.0];
        let y = [11.0, 12.0, 13.0];
        let mut z = [0.0; 3];

        unsafe {
            PointerBackend::daxpy(2.0, &x, &y, &mut z);
        }

        assert_eq!(z, [13.0, 16.0, 19.0]);
    }

    #[test]
    fn test_pointer_daxpy_empty() {
        let mut z: Vec<f64> = Vec::new();
        unsafe {
            PointerBackend::daxpy(2.0, &[], &[], &mut z);
        }
        assert!(z.is_empty());
    }

    #[test]
    fn test_pointer_matches_scalar() {
        let x: Vec<f64> = (0..257).map(|i| (i as f64).sin()).collect();
        let y: Vec<f64> = (0..257).map(|i| (i as f64).cos()).collect();

        let mut pointer_result = vec![0.0; x.len()];
        let mut scalar_result = vec![0.0; x.len()];
        unsafe {
            PointerBackend::daxpy(0.75, &x, &y, &mut pointer_result);
            ScalarBackend::daxpy(0.75, &x, &y, &mut scalar_result);
        }

        assert_eq!(pointer_result, scalar_result);
    }
}
