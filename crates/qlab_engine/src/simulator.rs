//! State-vector simulator
//!
//! Holds the full 2ⁿ amplitude vector of an n-qubit register and mutates it
//! in place through gate application, measurement and reset.
//!
//! Single-qubit gates read from the current (frozen) buffer and write into a
//! scratch buffer which is renormalized and then swapped in, so every
//! amplitude pair is derived from pre-update values exactly once.

use crate::config::SimulatorConfig;
use crate::state::QuantumState;
use log::trace;
use qlab_core::complex::{self, Complex, ONE, ZERO};
use qlab_core::constants::engine::{
    dimension, DEGENERATE_NORM_SQR, MAX_QUBITS, NORMALIZATION_TOLERANCE,
};
use qlab_core::types::to_bitstring;
use qlab_core::{Counts, Gate, Matrix2, QlabError, QlabResult, QubitId, TwoQubitRule};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::fmt;

/// State-vector engine over an injectable random source
pub struct Simulator<R = ChaCha8Rng> {
    /// Number of qubits (fixed at construction)
    num_qubits: usize,

    /// Live amplitude vector
    amplitudes: Vec<Complex>,

    /// Write buffer for single-qubit gates and collapse
    scratch: Vec<Complex>,

    /// Tolerance used by `is_normalized`
    tolerance: f64,

    /// Random source for measurement sampling
    rng: R,
}

impl Simulator<ChaCha8Rng> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an entropy-seeded simulator in |0…0⟩
    pub fn new(num_qubits: usize) -> QlabResult<Self> {
        Self::with_rng(num_qubits, ChaCha8Rng::from_entropy())
    }

    /// Create a simulator with a fixed seed
    pub fn seeded(num_qubits: usize, seed: u64) -> QlabResult<Self> {
        Self::with_rng(num_qubits, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a simulator from a configuration
    pub fn from_config(config: &SimulatorConfig) -> QlabResult<Self> {
        check_qubit_count(config.num_qubits)?;
        config.validate().map_err(QlabError::InvalidConfig)?;

        let mut sim = match config.seed {
            Some(seed) => Self::seeded(config.num_qubits, seed)?,
            None => Self::new(config.num_qubits)?,
        };
        sim.tolerance = config.tolerance;
        Ok(sim)
    }
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator in |0…0⟩ drawing randomness from `rng`
    pub fn with_rng(num_qubits: usize, rng: R) -> QlabResult<Self> {
        check_qubit_count(num_qubits)?;

        let dim = dimension(num_qubits);
        let mut amplitudes = vec![ZERO; dim];
        amplitudes[0] = ONE;

        Ok(Self {
            num_qubits,
            amplitudes,
            scratch: vec![ZERO; dim],
            tolerance: NORMALIZATION_TOLERANCE,
            rng,
        })
    }

    // ========================================================================
    // Gate Application
    // ========================================================================

    /// Apply `gate` to `targets`.
    ///
    /// Single-qubit gates take one target; two-qubit gates take
    /// `[control, target]`. Any other target count is an arity error.
    pub fn apply(&mut self, gate: &Gate, targets: &[QubitId]) -> QlabResult<()> {
        if targets.len() != gate.arity() {
            return Err(QlabError::ArityMismatch {
                gate: gate.name().to_string(),
                expected: gate.arity(),
                got: targets.len(),
            });
        }

        trace!("apply {} on {:?}", gate.name(), targets);

        match gate {
            Gate::Single(matrix) => self.apply_matrix(matrix, targets[0]),
            Gate::TwoQubit(rule) => self.apply_two_qubit(*rule, targets[0], targets[1]),
        }
    }

    /// Apply a 2×2 matrix to qubit `q`, then renormalize.
    ///
    /// The engine state is left untouched when renormalization fails.
    pub fn apply_matrix(&mut self, m: &Matrix2, q: QubitId) -> QlabResult<()> {
        self.check_qubit(q)?;

        let mask = 1usize << q;
        let old = &self.amplitudes;
        let new = &mut self.scratch;

        for i0 in (0..old.len()).filter(|i| i & mask == 0) {
            let i1 = i0 | mask;
            let (a, b) = (old[i0], old[i1]);
            new[i0] = m[0][0] * a + m[0][1] * b;
            new[i1] = m[1][0] * a + m[1][1] * b;
        }

        complex::normalize_in_place(&mut self.scratch)?;
        std::mem::swap(&mut self.amplitudes, &mut self.scratch);
        Ok(())
    }

    /// Controlled-NOT with `control` and `target`
    pub fn apply_cnot(&mut self, control: QubitId, target: QubitId) -> QlabResult<()> {
        self.apply_two_qubit(TwoQubitRule::ControlledNot, control, target)
    }

    fn apply_two_qubit(
        &mut self,
        rule: TwoQubitRule,
        control: QubitId,
        target: QubitId,
    ) -> QlabResult<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(QlabError::DuplicateQubit(control));
        }

        match rule {
            TwoQubitRule::ControlledNot => {
                let control_mask = 1usize << control;
                let target_mask = 1usize << target;

                // Each (target=0, target=1) pair under control=1 is swapped once
                for i in 0..self.amplitudes.len() {
                    if i & control_mask != 0 && i & target_mask == 0 {
                        self.amplitudes.swap(i, i | target_mask);
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Measure qubit `q`, collapsing the state. Returns 0 or 1.
    pub fn measure(&mut self, q: QubitId) -> QlabResult<u8> {
        self.check_qubit(q)?;

        let mask = 1usize << q;
        let (p0, p1) = self.split_probability(mask);
        let total = p0 + p1;
        if !total.is_finite() || total <= DEGENERATE_NORM_SQR {
            return Err(QlabError::DegenerateState);
        }

        let r: f64 = self.rng.gen();
        let outcome: u8 = if r * total < p0 { 0 } else { 1 };
        let keep = if outcome == 0 { 0 } else { mask };

        for (i, (dst, src)) in self.scratch.iter_mut().zip(&self.amplitudes).enumerate() {
            *dst = if i & mask == keep { *src } else { ZERO };
        }
        complex::normalize_in_place(&mut self.scratch)?;
        std::mem::swap(&mut self.amplitudes, &mut self.scratch);

        trace!("measure q{} -> {} (p0={:.6})", q, outcome, p0 / total);
        Ok(outcome)
    }

    /// Measure every qubit in order 0..n and return the resulting basis index
    pub fn measure_all(&mut self) -> QlabResult<usize> {
        let mut index = 0;
        for q in 0..self.num_qubits {
            if self.measure(q)? == 1 {
                index |= 1 << q;
            }
        }
        Ok(index)
    }

    /// Probability that qubit `q` reads `value` (non-destructive)
    pub fn probability_of(&self, q: QubitId, value: u8) -> QlabResult<f64> {
        self.check_qubit(q)?;
        let (p0, p1) = self.split_probability(1 << q);
        match value {
            0 => Ok(p0),
            1 => Ok(p1),
            other => Err(QlabError::InvalidInput(format!(
                "measurement value must be 0 or 1, got {}",
                other
            ))),
        }
    }

    /// Sample `shots` outcomes from the current distribution without collapse
    pub fn sample(&mut self, shots: u64) -> Counts {
        let probs = self.probabilities();
        let total: f64 = probs.iter().sum();
        let mut counts: Counts = HashMap::new();

        for _ in 0..shots {
            let r: f64 = self.rng.gen::<f64>() * total;
            let mut cumsum = 0.0;
            let mut outcome = probs.len() - 1;

            for (i, &p) in probs.iter().enumerate() {
                cumsum += p;
                if r < cumsum {
                    outcome = i;
                    break;
                }
            }

            *counts
                .entry(to_bitstring(outcome, self.num_qubits))
                .or_insert(0) += 1;
        }

        counts
    }

    fn split_probability(&self, mask: usize) -> (f64, f64) {
        self.amplitudes
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(p0, p1), (i, a)| {
                if i & mask == 0 {
                    (p0 + a.norm_sqr(), p1)
                } else {
                    (p0, p1 + a.norm_sqr())
                }
            })
    }

    // ========================================================================
    // Read-only Views
    // ========================================================================

    /// Squared magnitude per basis index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Detached copy of the current state
    pub fn state(&self) -> QuantumState {
        QuantumState {
            amplitudes: self.amplitudes.clone(),
            num_qubits: self.num_qubits,
        }
    }

    /// Read-only view of the live amplitudes
    ///
    /// The borrow ends before the next mutating call, so it can never observe a
    /// half-applied gate. Use [`Simulator::state`] for a copy that outlives it.
    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    /// Σ|a|² = 1 within the configured tolerance
    pub fn is_normalized(&self) -> bool {
        (complex::norm_sqr_sum(&self.amplitudes) - 1.0).abs() <= self.tolerance
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Force the register back to |0…0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(ZERO);
        self.amplitudes[0] = ONE;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2ⁿ)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Normalization tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The injected random source, shared with drivers for their own draws
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    fn check_qubit(&self, q: QubitId) -> QlabResult<()> {
        if q >= self.num_qubits {
            return Err(QlabError::QubitOutOfRange {
                qubit: q,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }
}

impl<R> fmt::Display for Simulator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulator({}Q, dim={})",
            self.num_qubits,
            self.amplitudes.len()
        )
    }
}

fn check_qubit_count(num_qubits: usize) -> QlabResult<()> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(QlabError::InvalidQubitCount {
            count: num_qubits,
            max: MAX_QUBITS,
        });
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
    use qlab_core::gate;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn assert_probs(sim: &Simulator, expected: &[f64]) {
        let probs = sim.probabilities();
        assert_eq!(probs.len(), expected.len());
        for (p, e) in probs.iter().zip(expected) {
            assert_abs_diff_eq!(*p, *e, epsilon = EPS);
        }
    }

    /// Entangled 3-qubit state with non-trivial phases
    fn scrambled(seed: u64) -> Simulator {
        let mut sim = Simulator::seeded(3, seed).unwrap();
        sim.apply(&Gate::ry(0.7), &[0]).unwrap();
        sim.apply(&Gate::rx(1.3), &[1]).unwrap();
        sim.apply(&Gate::cnot(), &[0, 2]).unwrap();
        sim.apply(&Gate::rz(0.4), &[2]).unwrap();
        sim.apply(&Gate::hadamard(), &[1]).unwrap();
        sim.apply(&Gate::phase(2.1), &[0]).unwrap();
        sim
    }

    #[test]
    fn test_new_is_ground_state() {
        let sim = Simulator::seeded(3, 1).unwrap();
        assert_eq!(sim.num_qubits(), 3);
        assert_eq!(sim.dimension(), 8);
        assert_probs(&sim, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_qubit_count() {
        assert!(matches!(
            Simulator::new(0),
            Err(QlabError::InvalidQubitCount { count: 0, .. })
        ));
        assert!(Simulator::new(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_pauli_x_example() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        sim.apply(&Gate::x(), &[0]).unwrap();
        assert_probs(&sim, &[0.0, 1.0]);
    }

    #[test]
    fn test_bell_pair() {
        let mut sim = Simulator::seeded(2, 1).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        sim.apply(&Gate::cnot(), &[0, 1]).unwrap();
        assert_probs(&sim, &[0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_cnot_control_zero_is_noop() {
        let mut sim = Simulator::seeded(2, 1).unwrap();
        sim.apply(&Gate::x(), &[1]).unwrap(); // |q1=1, q0=0⟩ = index 2
        sim.apply_cnot(0, 1).unwrap();
        assert_probs(&sim, &[0.0, 0.0, 1.0, 0.0]);

        sim.apply_cnot(1, 0).unwrap(); // control q1 set -> flip q0
        assert_probs(&sim, &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hadamard_involution() {
        for q in 0..3 {
            let mut sim = scrambled(5);
            let before = sim.state();
            sim.apply(&Gate::hadamard(), &[q]).unwrap();
            sim.apply(&Gate::hadamard(), &[q]).unwrap();
            for (a, b) in sim.amplitudes().iter().zip(&before.amplitudes) {
                assert!(complex::approx_eq(*a, *b, EPS));
            }
        }
    }

    #[test]
    fn test_pauli_x_involution() {
        let mut sim = scrambled(6);
        let before = sim.state();
        sim.apply(&Gate::x(), &[2]).unwrap();
        assert_ne!(sim.state(), before);
        sim.apply(&Gate::x(), &[2]).unwrap();
        for (a, b) in sim.amplitudes().iter().zip(&before.amplitudes) {
            assert!(complex::approx_eq(*a, *b, EPS));
        }
    }

    #[test]
    fn test_rx_inverse_on_state() {
        let mut sim = scrambled(7);
        let before = sim.state();
        sim.apply(&Gate::rx(0.83), &[1]).unwrap();
        sim.apply(&Gate::rx(-0.83), &[1]).unwrap();
        assert_abs_diff_eq!(sim.state().fidelity(&before), 1.0, epsilon = EPS);
    }

    #[test]
    fn test_single_qubit_gate_uses_pre_update_values() {
        // H on |+⟩ must give |0⟩ exactly; an in-place update would not
        let mut sim = Simulator::seeded(1, 1).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        assert_probs(&sim, &[1.0, 0.0]);
    }

    #[test]
    fn test_pauli_y_phase() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        sim.apply(&Gate::y(), &[0]).unwrap();
        // Y|0⟩ = i|1⟩
        assert!(complex::approx_eq(sim.amplitudes()[1], complex::I, EPS));
    }

    #[test]
    fn test_normalization_after_every_operation() {
        let mut sim = scrambled(8);
        assert!(sim.is_normalized());
        sim.apply(&Gate::ry(PI / 3.0), &[2]).unwrap();
        assert!(sim.is_normalized());
        sim.measure(1).unwrap();
        assert!(sim.is_normalized());
        sim.reset();
        assert!(sim.is_normalized());
        assert_abs_diff_eq!(sim.probabilities().iter().sum::<f64>(), 1.0, epsilon = EPS);
    }

    #[test]
    fn test_non_unitary_matrix_is_renormalized() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        let projector = [[ONE, ZERO], [ZERO, ZERO]];
        sim.apply(&Gate::Single(projector), &[0]).unwrap();
        assert_probs(&sim, &[1.0, 0.0]);
    }

    #[test]
    fn test_degenerate_matrix_leaves_state_untouched() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        let kill_zero = [[ZERO, ZERO], [ZERO, ONE]];
        assert_eq!(
            sim.apply(&Gate::Single(kill_zero), &[0]),
            Err(QlabError::DegenerateState)
        );
        assert_probs(&sim, &[1.0, 0.0]);
    }

    #[test]
    fn test_measurement_determinism() {
        for seed in 0..20 {
            let mut sim = scrambled(seed);
            for q in 0..3 {
                let first = sim.measure(q).unwrap();
                for _ in 0..5 {
                    assert_eq!(sim.measure(q).unwrap(), first);
                }
            }
        }
    }

    #[test]
    fn test_measure_collapses_bell_pair() {
        for seed in 0..10 {
            let mut sim = Simulator::seeded(2, seed).unwrap();
            sim.apply(&Gate::hadamard(), &[0]).unwrap();
            sim.apply(&Gate::cnot(), &[0, 1]).unwrap();
            let a = sim.measure(0).unwrap();
            let b = sim.measure(1).unwrap();
            assert_eq!(a, b);
            let index = if a == 1 { 3 } else { 0 };
            assert_abs_diff_eq!(sim.probabilities()[index], 1.0, epsilon = EPS);
        }
    }

    #[test]
    fn test_measure_certain_outcomes() {
        let mut sim = Simulator::seeded(2, 3).unwrap();
        sim.apply(&Gate::x(), &[1]).unwrap();
        assert_eq!(sim.measure(0).unwrap(), 0);
        assert_eq!(sim.measure(1).unwrap(), 1);
    }

    #[test]
    fn test_measure_statistics() {
        let mut ones = 0;
        let mut sim = Simulator::seeded(1, 42).unwrap();
        for _ in 0..2000 {
            sim.reset();
            sim.apply(&Gate::ry(2.0 * PI / 3.0), &[0]).unwrap(); // P(1) = 0.75
            ones += sim.measure(0).unwrap() as usize;
        }
        let freq = ones as f64 / 2000.0;
        assert!(freq > 0.7 && freq < 0.8, "P(1) = {}", freq);
    }

    #[test]
    fn test_seed_reproducibility() {
        let run = |seed| {
            let mut sim = Simulator::seeded(3, seed).unwrap();
            (0..3).for_each(|q| sim.apply(&Gate::hadamard(), &[q]).unwrap());
            sim.measure_all().unwrap()
        };
        let outcomes_a: Vec<usize> = (0..10).map(run).collect();
        let outcomes_b: Vec<usize> = (0..10).map(run).collect();
        assert_eq!(outcomes_a, outcomes_b);
    }

    #[test]
    fn test_injected_rng() {
        let mut sim = Simulator::with_rng(2, StdRng::seed_from_u64(9)).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        let outcome = sim.measure_all().unwrap();
        assert!(outcome == 0 || outcome == 1);
        let _: f64 = sim.rng_mut().gen();
    }

    #[test]
    fn test_reset_idempotence() {
        let mut sim = scrambled(11);
        sim.measure(0).unwrap();
        sim.reset();
        assert_probs(&sim, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        sim.reset();
        assert_probs(&sim, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_state_is_a_copy() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        let mut snapshot = sim.state();
        snapshot.amplitudes[0] = ZERO;
        snapshot.amplitudes[1] = ONE;
        assert_probs(&sim, &[1.0, 0.0]);

        sim.apply(&Gate::x(), &[0]).unwrap();
        assert_eq!(snapshot.num_qubits, 1);
        assert_abs_diff_eq!(sim.state().probabilities()[1], 1.0, epsilon = EPS);
    }

    #[test]
    fn test_out_of_range_errors() {
        let mut sim = Simulator::seeded(2, 1).unwrap();
        assert_eq!(
            sim.apply(&Gate::x(), &[2]),
            Err(QlabError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2
            })
        );
        assert!(sim.apply(&Gate::cnot(), &[0, 5]).is_err());
        assert!(sim.measure(7).is_err());
        assert!(sim.probability_of(3, 0).is_err());
        assert_probs(&sim, &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_arity_errors() {
        let mut sim = Simulator::seeded(3, 1).unwrap();
        assert!(matches!(
            sim.apply(&Gate::x(), &[0, 1]),
            Err(QlabError::ArityMismatch { expected: 1, got: 2, .. })
        ));
        assert!(matches!(
            sim.apply(&Gate::cnot(), &[0]),
            Err(QlabError::ArityMismatch { expected: 2, got: 1, .. })
        ));
        assert!(sim.apply(&Gate::cnot(), &[0, 1, 2]).is_err());
        assert_eq!(
            sim.apply(&Gate::cnot(), &[1, 1]),
            Err(QlabError::DuplicateQubit(1))
        );
    }

    #[test]
    fn test_probability_of() {
        let mut sim = Simulator::seeded(2, 1).unwrap();
        sim.apply(&Gate::hadamard(), &[1]).unwrap();
        assert_abs_diff_eq!(sim.probability_of(0, 0).unwrap(), 1.0, epsilon = EPS);
        assert_abs_diff_eq!(sim.probability_of(1, 1).unwrap(), 0.5, epsilon = EPS);
        assert!(sim.probability_of(1, 2).is_err());
    }

    #[test]
    fn test_sample_counts() {
        let mut sim = Simulator::seeded(2, 42).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        sim.apply(&Gate::cnot(), &[0, 1]).unwrap();

        let counts = sim.sample(1000);
        assert_eq!(counts.values().sum::<u64>(), 1000);
        assert!(counts.keys().all(|k| k == "00" || k == "11"));
        let p00 = *counts.get("00").unwrap_or(&0) as f64 / 1000.0;
        assert!(p00 > 0.4 && p00 < 0.6, "P(00) = {}", p00);

        // Sampling does not collapse
        assert_probs(&sim, &[0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_from_config() {
        let config = SimulatorConfig::new(2).with_seed(3).with_tolerance(1e-6);
        let sim = Simulator::from_config(&config).unwrap();
        assert_eq!(sim.num_qubits(), 2);
        assert_eq!(sim.tolerance(), 1e-6);

        assert!(matches!(
            Simulator::from_config(&SimulatorConfig::new(0)),
            Err(QlabError::InvalidQubitCount { .. })
        ));
        assert!(matches!(
            Simulator::from_config(&SimulatorConfig::new(2).with_tolerance(-1.0)),
            Err(QlabError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_matches_matrix_form_of_gates() {
        // Applying Ry then Rz equals applying the product matrix
        let mut a = Simulator::seeded(1, 1).unwrap();
        a.apply(&Gate::ry(0.9), &[0]).unwrap();
        a.apply(&Gate::rz(1.7), &[0]).unwrap();

        let mut b = Simulator::seeded(1, 1).unwrap();
        b.apply_matrix(&gate::matmul(&gate::rz(1.7), &gate::ry(0.9)), 0)
            .unwrap();

        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(complex::approx_eq(*x, *y, EPS));
        }
    }

    #[test]
    fn test_state_is_detached_from_engine() {
        let mut sim = Simulator::seeded(1, 1).unwrap();
        let before = sim.state();
        sim.apply(&Gate::x(), &[0]).unwrap();

        assert_abs_diff_eq!(before.amplitudes[0].re, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(before.amplitudes[1].norm(), 0.0, epsilon = EPS);
        assert_abs_diff_eq!(sim.amplitudes()[1].re, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(sim.amplitudes()[0].norm(), 0.0, epsilon = EPS);
    }
}
