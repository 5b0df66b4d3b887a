//! # qlab Engine
//!
//! Classical state-vector simulator for small qubit registers.
//!
//! ## Architecture
//!
//! ```text
//! qlab_engine
//!     SimulatorConfig // register size, seed, tolerance
//!     Simulator       // amplitude vector + injected RNG
//!         apply()          - single-qubit matrix or CNOT
//!         measure()        - sample, collapse, renormalize
//!         probabilities()  - |a|² per basis index
//!         state()          - detached snapshot
//!         reset()          - back to |0…0⟩
//!     QuantumState    // immutable snapshot
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlab_engine::prelude::*;
//!
//! // Bell pair
//! let mut sim = Simulator::seeded(2, 42).unwrap();
//! sim.apply(&Gate::hadamard(), &[0]).unwrap();
//! sim.apply(&Gate::cnot(), &[0, 1]).unwrap();
//!
//! let probs = sim.probabilities();
//! assert!((probs[0] - 0.5).abs() < 1e-9);
//! assert!((probs[3] - 0.5).abs() < 1e-9);
//!
//! // Measuring one half fixes the other
//! let a = sim.measure(0).unwrap();
//! let b = sim.measure(1).unwrap();
//! assert_eq!(a, b);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Engine configuration
pub mod config;

/// State snapshots
pub mod state;

/// State-vector simulator
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::SimulatorConfig;
pub use simulator::Simulator;
pub use state::QuantumState;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qlab_engine::prelude::*;
    //! ```

    pub use crate::config::SimulatorConfig;
    pub use crate::simulator::Simulator;
    pub use crate::state::QuantumState;
    pub use qlab_core::prelude::*;
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_ghz_state() {
        let mut sim = Simulator::seeded(4, 42).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        for q in 0..3 {
            sim.apply(&Gate::cnot(), &[q, q + 1]).unwrap();
        }

        let probs = sim.probabilities();
        assert_abs_diff_eq!(probs[0], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(probs[15], 0.5, epsilon = 1e-9);

        let outcome = sim.measure_all().unwrap();
        assert!(outcome == 0 || outcome == 15);
    }

    #[test]
    fn test_h_rz_h_is_x() {
        let mut sim = Simulator::seeded(1, 42).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        sim.apply(&Gate::rz(PI), &[0]).unwrap();
        sim.apply(&Gate::hadamard(), &[0]).unwrap();
        assert_abs_diff_eq!(sim.probabilities()[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cz_from_h_cnot_h() {
        // |11⟩ picks up a −1 phase under CZ = H(t)·CNOT·H(t)
        let mut sim = Simulator::seeded(2, 1).unwrap();
        sim.apply(&Gate::x(), &[0]).unwrap();
        sim.apply(&Gate::x(), &[1]).unwrap();
        sim.apply(&Gate::hadamard(), &[1]).unwrap();
        sim.apply(&Gate::cnot(), &[0, 1]).unwrap();
        sim.apply(&Gate::hadamard(), &[1]).unwrap();

        let amp = sim.amplitudes()[3];
        assert_abs_diff_eq!(amp.re, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(amp.im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_superposition() {
        let mut sim = Simulator::seeded(5, 42).unwrap();
        for q in 0..5 {
            sim.apply(&Gate::hadamard(), &[q]).unwrap();
        }
        for p in sim.probabilities() {
            assert_abs_diff_eq!(p, 1.0 / 32.0, epsilon = 1e-9);
        }
        assert!(sim.is_normalized());
    }

    #[test]
    fn test_snapshot_display() {
        let mut sim = Simulator::seeded(2, 42).unwrap();
        sim.apply(&Gate::x(), &[1]).unwrap();
        let text = sim.state().to_string();
        assert!(text.contains("|10⟩"));
        assert_eq!(sim.to_string(), "Simulator(2Q, dim=4)");
    }

    #[test]
    fn test_simulator_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Simulator>();
        assert_send::<QuantumState>();
    }
}
