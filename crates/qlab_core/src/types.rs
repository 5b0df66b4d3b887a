//! Core types for qlab
//!
//! Type aliases and basis-index helpers shared by the engine and drivers.
//! Qubit `i` is bit `i` of a basis index (qubit 0 is the least significant bit).

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
pub type QubitId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Measurement counts: bitstring -> count
pub type Counts = HashMap<String, u64>;

/// Parameter vector for variational circuits
pub type ParamVec = Vec<f64>;

// ============================================================================
// Basis Index Helpers
// ============================================================================

/// Classical value (0 or 1) of `qubit` in basis index `index`
#[inline]
pub fn bit(index: usize, qubit: QubitId) -> u8 {
    ((index >> qubit) & 1) as u8
}

/// Expand a basis index into per-qubit values, element `i` = qubit `i`
pub fn index_to_bits(index: usize, num_qubits: usize) -> Vec<u8> {
    (0..num_qubits).map(|q| bit(index, q)).collect()
}

/// Render a basis index as a bitstring, most significant qubit first
pub fn to_bitstring(index: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

// ============================================================================
// Tests
// ============================================================================
