//! Immutable state snapshots
//!
//! A [`QuantumState`] is a detached copy of the engine's amplitude vector.
//! Mutating a snapshot never touches the engine that produced it.

use qlab_core::complex::{self, Complex};
use qlab_core::types::to_bitstring;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a register: 2ⁿ amplitudes plus the qubit count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumState {
    /// Amplitudes indexed by computational basis index
    pub amplitudes: Vec<Complex>,

    /// Number of qubits n (amplitudes.len() == 2ⁿ)
    pub num_qubits: usize,
}

impl QuantumState {
    /// Squared magnitude per basis index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ|amplitude|²
    pub fn norm_sqr(&self) -> f64 {
        complex::norm_sqr_sum(&self.amplitudes)
    }

    /// |⟨self|other⟩|²; zero when the registers differ in size
    pub fn fidelity(&self, other: &QuantumState) -> f64 {
        if self.num_qubits != other.num_qubits {
            return 0.0;
        }
        complex::inner_product(&self.amplitudes, &other.amplitudes).norm_sqr()
    }

    /// Basis index with the largest probability (lowest index on ties)
    pub fn most_probable(&self) -> usize {
        let mut best = 0;
        let mut best_p = f64::NEG_INFINITY;
        for (i, a) in self.amplitudes.iter().enumerate() {
            let p = a.norm_sqr();
            if p > best_p {
                best = i;
                best_p = p;
            }
        }
        best
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuantumState({}Q)", self.num_qubits)?;
        for (i, a) in self.amplitudes.iter().enumerate() {
            if a.norm_sqr() > 1e-12 {
                write!(
                    f,
                    "\n  |{}⟩ {:.4} (p={:.4})",
                    to_bitstring(i, self.num_qubits),
                    a,
                    a.norm_sqr()
                )?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
