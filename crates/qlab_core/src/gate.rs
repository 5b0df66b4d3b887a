//! Gate library for qlab
//!
//! Pure constructors for 2×2 single-qubit unitaries and the fixed 4×4 CNOT
//! permutation, plus the closed [`Gate`] variant the engine dispatches on.
//! Matrices are qubit-agnostic; targets are supplied when a gate is applied.

use crate::complex::{approx_eq, complex, Complex, I, ONE, ZERO};
use crate::types::Angle;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};
use std::fmt;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex; 2]; 2];

/// Row-major 4×4 complex matrix
pub type Matrix4 = [[Complex; 4]; 4];

// ============================================================================
// Fixed Gates
// ============================================================================

/// Hadamard = (1/√2)·[[1, 1], [1, −1]]
pub fn hadamard() -> Matrix2 {
    let h = complex(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Pauli-X (NOT)
pub fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli-Y
pub fn pauli_y() -> Matrix2 {
    [[ZERO, -I], [I, ZERO]]
}

/// Pauli-Z
pub fn pauli_z() -> Matrix2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

/// 2×2 identity
pub fn identity() -> Matrix2 {
    [[ONE, ZERO], [ZERO, ONE]]
}

/// CNOT on (control, target): |00⟩→|00⟩, |01⟩→|01⟩, |10⟩→|11⟩, |11⟩→|10⟩
pub fn cnot_matrix() -> Matrix4 {
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
        [ZERO, ZERO, ONE, ZERO],
    ]
}

// ============================================================================
// Parameterized Gates
// ============================================================================

/// Phase(θ) = diag(1, e^{iθ})
pub fn phase(theta: Angle) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex::from_polar(1.0, theta)]]
}

/// S = Phase(π/2)
pub fn s() -> Matrix2 {
    phase(FRAC_PI_2)
}

/// T = Phase(π/4)
pub fn t() -> Matrix2 {
    phase(FRAC_PI_4)
}

/// T† = Phase(−π/4)
pub fn t_dagger() -> Matrix2 {
    phase(-FRAC_PI_4)
}

/// Rx(θ) = [[cos θ/2, −i sin θ/2], [−i sin θ/2, cos θ/2]]
pub fn rx(theta: Angle) -> Matrix2 {
    let c = complex((theta / 2.0).cos(), 0.0);
    let s = complex(0.0, -(theta / 2.0).sin());
    [[c, s], [s, c]]
}

/// Ry(θ) = [[cos θ/2, −sin θ/2], [sin θ/2, cos θ/2]]
pub fn ry(theta: Angle) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [[complex(c, 0.0), complex(-s, 0.0)], [complex(s, 0.0), complex(c, 0.0)]]
}

/// Rz(θ) = diag(e^{−iθ/2}, e^{iθ/2})
pub fn rz(theta: Angle) -> Matrix2 {
    [
        [Complex::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex::from_polar(1.0, theta / 2.0)],
    ]
}

// ============================================================================
// Matrix Helpers
// ============================================================================

/// a · b
pub fn matmul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[ZERO; 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
        }
    }
    out
}

/// Conjugate transpose
pub fn dagger(m: &Matrix2) -> Matrix2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Element-wise comparison within `eps`
pub fn approx_eq_matrix(a: &Matrix2, b: &Matrix2, eps: f64) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| approx_eq(*x, *y, eps))
}

/// U†U = I within `eps`
pub fn is_unitary(m: &Matrix2, eps: f64) -> bool {
    approx_eq_matrix(&matmul(&dagger(m), m), &identity(), eps)
}

// ============================================================================
// Gate Variant
// ============================================================================

/// Permutation rules for two-qubit gates.
///
/// The engine applies two-qubit gates as basis permutations, so only
/// permutation gates can be expressed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwoQubitRule {
    /// Flip the target bit wherever the control bit is 1
    ControlledNot,
}

impl TwoQubitRule {
    /// Matrix form on the (control, target) pair
    pub fn matrix(&self) -> Matrix4 {
        match self {
            TwoQubitRule::ControlledNot => cnot_matrix(),
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TwoQubitRule::ControlledNot => "CNOT",
        }
    }
}

/// A gate the engine knows how to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Arbitrary 2×2 matrix on one qubit
    Single(Matrix2),

    /// Permutation on a (control, target) pair
    TwoQubit(TwoQubitRule),
}

impl Gate {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Hadamard
    pub fn hadamard() -> Self {
        Gate::Single(hadamard())
    }

    /// Pauli-X
    pub fn x() -> Self {
        Gate::Single(pauli_x())
    }

    /// Pauli-Y
    pub fn y() -> Self {
        Gate::Single(pauli_y())
    }

    /// Pauli-Z
    pub fn z() -> Self {
        Gate::Single(pauli_z())
    }

    /// Phase(θ)
    pub fn phase(theta: Angle) -> Self {
        Gate::Single(phase(theta))
    }

    /// Rx(θ)
    pub fn rx(theta: Angle) -> Self {
        Gate::Single(rx(theta))
    }

    /// Ry(θ)
    pub fn ry(theta: Angle) -> Self {
        Gate::Single(ry(theta))
    }

    /// Rz(θ)
    pub fn rz(theta: Angle) -> Self {
        Gate::Single(rz(theta))
    }

    /// Controlled-NOT
    pub fn cnot() -> Self {
        Gate::TwoQubit(TwoQubitRule::ControlledNot)
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Number of target qubits the gate takes
    pub fn arity(&self) -> usize {
        match self {
            Gate::Single(_) => 1,
            Gate::TwoQubit(_) => 2,
        }
    }

    /// Short name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Single(_) => "U2",
            Gate::TwoQubit(rule) => rule.name(),
        }
    }
}

impl From<Matrix2> for Gate {
    fn from(m: Matrix2) -> Self {
        Gate::Single(m)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Single(m) => write!(
                f,
                "U2[[{:.3}, {:.3}], [{:.3}, {:.3}]]",
                m[0][0], m[0][1], m[1][0], m[1][1]
            ),
            Gate::TwoQubit(rule) => write!(f, "{}", rule.name()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_fixed_gates_unitary() {
        for m in [hadamard(), pauli_x(), pauli_y(), pauli_z(), s(), t()] {
            assert!(is_unitary(&m, EPS));
        }
    }

    #[test]
    fn test_rotations_unitary() {
        for theta in [0.0, 0.3, PI / 3.0, PI, 2.5 * PI, -1.7] {
            assert!(is_unitary(&rx(theta), EPS));
            assert!(is_unitary(&ry(theta), EPS));
            assert!(is_unitary(&rz(theta), EPS));
            assert!(is_unitary(&phase(theta), EPS));
        }
    }

    #[test]
    fn test_zero_rotations_are_identity() {
        assert!(approx_eq_matrix(&rz(0.0), &identity(), EPS));
        assert!(approx_eq_matrix(&ry(0.0), &identity(), EPS));
        assert!(approx_eq_matrix(&rx(0.0), &identity(), EPS));
    }

    #[test]
    fn test_rx_inverse() {
        for theta in [0.4, 1.0, PI, 5.0] {
            let product = matmul(&rx(-theta), &rx(theta));
            assert!(approx_eq_matrix(&product, &identity(), EPS));
        }
    }

    #[test]
    fn test_involutions() {
        for m in [hadamard(), pauli_x(), pauli_y(), pauli_z()] {
            assert!(approx_eq_matrix(&matmul(&m, &m), &identity(), EPS));
        }
    }

    #[test]
    fn test_t_squared_is_s() {
        assert!(approx_eq_matrix(&matmul(&t(), &t()), &s(), EPS));
        assert!(approx_eq_matrix(&matmul(&t(), &t_dagger()), &identity(), EPS));
    }

    #[test]
    fn test_rz_matches_phase_up_to_global_phase() {
        // Rz(θ) = e^{-iθ/2}·Phase(θ)
        let theta = 0.9;
        let g = Complex::from_polar(1.0, -theta / 2.0);
        let p = phase(theta);
        let scaled = [[p[0][0] * g, p[0][1] * g], [p[1][0] * g, p[1][1] * g]];
        assert!(approx_eq_matrix(&rz(theta), &scaled, EPS));
    }

    #[test]
    fn test_cnot_permutation() {
        let m = cnot_matrix();
        // Column j holds the image of basis |j⟩
        let images: Vec<usize> = (0..4)
            .map(|j| (0..4).find(|&i| m[i][j] == ONE).unwrap())
            .collect();
        assert_eq!(images, vec![0, 1, 3, 2]);
        assert_eq!(TwoQubitRule::ControlledNot.matrix(), m);
    }

    #[test]
    fn test_gate_arity() {
        assert_eq!(Gate::hadamard().arity(), 1);
        assert_eq!(Gate::cnot().arity(), 2);
        assert_eq!(Gate::cnot().name(), "CNOT");
        assert_eq!(Gate::from(pauli_x()), Gate::x());
    }

    #[test]
    fn test_gate_json() {
        let json = serde_json::to_string(&Gate::cnot()).unwrap();
        assert_eq!(json, r#"{"TwoQubit":"ControlledNot"}"#);

        let json = serde_json::to_string(&Gate::x()).unwrap();
        let restored: Gate = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Gate::x());
    }
}
