//! Shared gate sequences
//!
//! Composite operations the drivers build from the engine's primitive gates.
//! The engine only knows single-qubit matrices and CNOT, so everything wider
//! is decomposed here.

use qlab_core::{Angle, Gate, QlabError, QlabResult, QubitId};
use qlab_engine::Simulator;
use rand::Rng;
use std::f64::consts::PI;

// ============================================================================
// Layers
// ============================================================================

/// Hadamard on each listed qubit
pub fn hadamard_layer<R: Rng>(sim: &mut Simulator<R>, qubits: &[QubitId]) -> QlabResult<()> {
    let h = Gate::hadamard();
    for &q in qubits {
        sim.apply(&h, &[q])?;
    }
    Ok(())
}

/// Hadamard on every qubit of the register
pub fn hadamard_all<R: Rng>(sim: &mut Simulator<R>) -> QlabResult<()> {
    let all: Vec<QubitId> = (0..sim.num_qubits()).collect();
    hadamard_layer(sim, &all)
}

/// Pauli-X on every qubit whose bit in `pattern` is 0
///
/// Maps |pattern⟩ to |1…1⟩ on `qubits`, so a phase on the all-ones state
/// lands on `pattern` instead. Self-inverse.
pub fn flip_zeros<R: Rng>(
    sim: &mut Simulator<R>,
    qubits: &[QubitId],
    pattern: usize,
) -> QlabResult<()> {
    let x = Gate::x();
    for (i, &q) in qubits.iter().enumerate() {
        if (pattern >> i) & 1 == 0 {
            sim.apply(&x, &[q])?;
        }
    }
    Ok(())
}

// ============================================================================
// Multi-Controlled Phase
// ============================================================================

/// Multiply the amplitude of every basis state with all `qubits` set by e^{iθ}
///
/// Uses the parity expansion
/// x₁·x₂·…·xₖ = 2^{1−k} · Σ_{S≠∅} (−1)^{|S|+1} · ⊕_{i∈S} xᵢ,
/// so the phase splits into one `Phase` rotation per nonempty subset,
/// applied to the subset parity computed with a CNOT ladder and uncomputed
/// afterwards. Cost grows as 2ᵏ, fine for the register sizes used here.
pub fn multi_controlled_phase<R: Rng>(
    sim: &mut Simulator<R>,
    qubits: &[QubitId],
    theta: Angle,
) -> QlabResult<()> {
    let k = qubits.len();
    if k == 0 {
        return Err(QlabError::InvalidInput(
            "multi-controlled phase needs at least one qubit".to_string(),
        ));
    }
    for (i, q) in qubits.iter().enumerate() {
        if *q >= sim.num_qubits() {
            return Err(QlabError::QubitOutOfRange {
                qubit: *q,
                num_qubits: sim.num_qubits(),
            });
        }
        if qubits[..i].contains(q) {
            return Err(QlabError::DuplicateQubit(*q));
        }
    }

    let scale = theta / (1u64 << (k - 1)) as f64;

    for subset in 1usize..(1 << k) {
        let members: Vec<QubitId> = (0..k)
            .filter(|i| (subset >> i) & 1 == 1)
            .map(|i| qubits[i])
            .collect();
        let (&last, rest) = match members.split_last() {
            Some(split) => split,
            None => continue,
        };

        let sign = if members.len() % 2 == 1 { 1.0 } else { -1.0 };

        for &c in rest {
            sim.apply_cnot(c, last)?;
        }
        sim.apply(&Gate::phase(sign * scale), &[last])?;
        for &c in rest.iter().rev() {
            sim.apply_cnot(c, last)?;
        }
    }

    Ok(())
}

/// Multi-controlled Z: flip the sign of the all-ones state on `qubits`
pub fn multi_controlled_z<R: Rng>(sim: &mut Simulator<R>, qubits: &[QubitId]) -> QlabResult<()> {
    multi_controlled_phase(sim, qubits, PI)
}

// ============================================================================
// Two-Body Interaction
// ============================================================================

/// e^{−i·angle/2·ZᵢZⱼ} as CNOT(i,j) · Rz(angle) on j · CNOT(i,j)
pub fn zz_interaction<R: Rng>(
    sim: &mut Simulator<R>,
    i: QubitId,
    j: QubitId,
    angle: Angle,
) -> QlabResult<()> {
    sim.apply_cnot(i, j)?;
    sim.apply(&Gate::rz(angle), &[j])?;
    sim.apply_cnot(i, j)
}

// ============================================================================
// Tests
// ============================================================================
