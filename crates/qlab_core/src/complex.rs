//! Complex arithmetic for amplitudes
//!
//! Amplitudes are `num_complex::Complex64`. The free functions here name the
//! operations the engine relies on and add vector normalization with an
//! explicit failure for degenerate vectors.

use crate::constants::engine::DEGENERATE_NORM_SQR;
use crate::error::{QlabError, QlabResult};

pub use num_complex::Complex64 as Complex;

/// 0 + 0i
pub const ZERO: Complex = Complex::new(0.0, 0.0);

/// 1 + 0i
pub const ONE: Complex = Complex::new(1.0, 0.0);

/// 0 + 1i
pub const I: Complex = Complex::new(0.0, 1.0);

/// Build a complex value from its parts
#[inline]
pub fn complex(re: f64, im: f64) -> Complex {
    Complex::new(re, im)
}

// ============================================================================
// Scalar Operations
// ============================================================================

/// a + b
#[inline]
pub fn add(a: Complex, b: Complex) -> Complex {
    a + b
}

/// (ac − bd) + (ad + bc)i
#[inline]
pub fn multiply(a: Complex, b: Complex) -> Complex {
    a * b
}

/// re − im·i
#[inline]
pub fn conjugate(z: Complex) -> Complex {
    z.conj()
}

/// √(re² + im²)
#[inline]
pub fn magnitude(z: Complex) -> f64 {
    z.norm()
}

/// atan2(im, re)
#[inline]
pub fn phase(z: Complex) -> f64 {
    z.arg()
}

/// Multiply both parts by a real scalar
#[inline]
pub fn scale(z: Complex, scalar: f64) -> Complex {
    z.scale(scalar)
}

/// Component-wise comparison within `eps`
#[inline]
pub fn approx_eq(a: Complex, b: Complex, eps: f64) -> bool {
    (a.re - b.re).abs() <= eps && (a.im - b.im).abs() <= eps
}

// ============================================================================
// Vector Operations
// ============================================================================

/// Σ|zᵢ|²
pub fn norm_sqr_sum(vector: &[Complex]) -> f64 {
    vector.iter().map(|z| z.norm_sqr()).sum()
}

/// ⟨a|b⟩ = Σ conj(aᵢ)·bᵢ over the common prefix
pub fn inner_product(a: &[Complex], b: &[Complex]) -> Complex {
    a.iter().zip(b).map(|(x, y)| x.conj() * y).sum()
}

/// Divide every element by √(Σ|element|²), returning a new vector
pub fn normalize(vector: &[Complex]) -> QlabResult<Vec<Complex>> {
    let mut out = vector.to_vec();
    normalize_in_place(&mut out)?;
    Ok(out)
}

/// In-place variant of [`normalize`]; the vector is untouched on error
pub fn normalize_in_place(vector: &mut [Complex]) -> QlabResult<()> {
    let norm_sqr = norm_sqr_sum(vector);
    if !norm_sqr.is_finite() || norm_sqr <= DEGENERATE_NORM_SQR {
        return Err(QlabError::DegenerateState);
    }

    let inv = 1.0 / norm_sqr.sqrt();
    for z in vector.iter_mut() {
        *z = z.scale(inv);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_multiply_formula() {
        // (1 + 2i)(3 + 4i) = 3 - 8 + (4 + 6)i = -5 + 10i
        let z = multiply(complex(1.0, 2.0), complex(3.0, 4.0));
        assert_eq!(z, complex(-5.0, 10.0));
        assert_eq!(multiply(I, I), complex(-1.0, 0.0));
    }

    #[test]
    fn test_add_and_conjugate() {
        assert_eq!(add(complex(1.0, -1.0), complex(0.5, 3.0)), complex(1.5, 2.0));
        assert_eq!(conjugate(complex(2.0, 3.0)), complex(2.0, -3.0));
    }

    #[test]
    fn test_magnitude_and_phase() {
        assert_abs_diff_eq!(magnitude(complex(3.0, 4.0)), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(phase(I), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(phase(complex(-1.0, 0.0)), PI, epsilon = 1e-12);
        assert_eq!(phase(ZERO), 0.0);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(complex(1.0, -2.0), 0.5), complex(0.5, -1.0));
    }

    #[test]
    fn test_normalize() {
        let v = normalize(&[complex(3.0, 0.0), complex(0.0, 4.0)]).unwrap();
        assert_abs_diff_eq!(v[0].re, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(v[1].im, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_sqr_sum(&v), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        let mut v = vec![ZERO; 4];
        assert_eq!(normalize_in_place(&mut v), Err(QlabError::DegenerateState));
        assert!(v.iter().all(|z| *z == ZERO));
    }

    #[test]
    fn test_normalize_nan_fails() {
        let v = [complex(f64::NAN, 0.0), ONE];
        assert_eq!(normalize(&v), Err(QlabError::DegenerateState));
    }

    #[test]
    fn test_inner_product() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let plus = [complex(s, 0.0), complex(s, 0.0)];
        let minus = [complex(s, 0.0), complex(-s, 0.0)];
        assert!(approx_eq(inner_product(&plus, &plus), ONE, 1e-12));
        assert!(approx_eq(inner_product(&plus, &minus), ZERO, 1e-12));
        assert!(approx_eq(inner_product(&[I], &[I]), ONE, 1e-12));
    }
}
