//! # qlab Core
//!
//! Foundation types for the qlab state-vector simulator: errors, constants,
//! complex arithmetic and the gate library.
//!
//! ## Architecture
//!
//! ```text
//! qlab_core
//!     error     // QlabError, QlabResult
//!     constants // engine limits, driver defaults
//!     types     // QubitId, Counts, basis-index helpers
//!     complex   // Complex64 arithmetic, normalize
//!     gate      // H, X, Y, Z, Phase, Rx, Ry, Rz, CNOT; Gate variant
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlab_core::prelude::*;
//!
//! let h = gate::hadamard();
//! assert!(gate::is_unitary(&h, 1e-12));
//!
//! let product = gate::matmul(&gate::rx(0.7), &gate::rx(-0.7));
//! assert!(gate::approx_eq_matrix(&product, &gate::identity(), 1e-12));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Error types
pub mod error;

/// Constants
pub mod constants;

/// Core types
pub mod types;

/// Complex arithmetic
pub mod complex;

/// Gate library
pub mod gate;

// ============================================================================
// Re-exports
// ============================================================================

pub use complex::Complex;
pub use constants::{algorithms, engine};
pub use error::{QlabError, QlabResult};
pub use gate::{Gate, Matrix2, Matrix4, TwoQubitRule};
pub use types::{Angle, Counts, ParamVec, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qlab_core::prelude::*;
    //! ```

    pub use crate::complex::{self, Complex};
    pub use crate::constants::{algorithms, engine};
    pub use crate::error::{QlabError, QlabResult};
    pub use crate::gate::{self, Gate, Matrix2, Matrix4, TwoQubitRule};
    pub use crate::types::{Angle, Counts, ParamVec, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_hadamard_maps_zero_to_plus() {
        let h = gate::hadamard();
        let out = [h[0][0] * complex::ONE, h[1][0] * complex::ONE];
        assert!(complex::approx_eq(out[0], out[1], 1e-12));
        assert!((complex::norm_sqr_sum(&out) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hzh_equals_x() {
        let h = gate::hadamard();
        let hzh = gate::matmul(&h, &gate::matmul(&gate::pauli_z(), &h));
        assert!(gate::approx_eq_matrix(&hzh, &gate::pauli_x(), 1e-12));
    }

    #[test]
    fn test_ry_pi_flips_zero() {
        let m = gate::ry(PI);
        // Column 0 is the image of |0⟩: (cos π/2, sin π/2) = (0, 1)
        assert!(complex::magnitude(m[0][0]) < 1e-12);
        assert!((complex::magnitude(m[1][0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_engine_constants() {
        assert_eq!(engine::NORMALIZATION_TOLERANCE, 1e-9);
        assert_eq!(algorithms::SHOR_QUBITS, 8);
        assert!(engine::MAX_QUBITS >= 10);
    }
}
