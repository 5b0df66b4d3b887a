//! Simulator configuration
//!
//! Serializable description of an engine: register size, optional seed and
//! the normalization tolerance used by `Simulator::is_normalized`.

use qlab_core::constants::engine::{MAX_QUBITS, NORMALIZATION_TOLERANCE};
use qlab_core::QlabResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of qubits
    pub num_qubits: usize,

    /// Random seed (entropy when absent)
    pub seed: Option<u64>,

    /// Tolerance for the normalization invariant
    pub tolerance: f64,
}

impl SimulatorConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Configuration for `num_qubits` with default tolerance and no seed
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            seed: None,
            tolerance: NORMALIZATION_TOLERANCE,
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QlabResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QlabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set number of qubits
    pub fn with_qubits(mut self, n: usize) -> Self {
        self.num_qubits = n;
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set normalization tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.num_qubits == 0 || self.num_qubits > MAX_QUBITS {
            return Err(format!(
                "num_qubits must be in [1, {}], got {}",
                MAX_QUBITS, self.num_qubits
            ));
        }

        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            ));
        }

        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for SimulatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SimulatorConfig({}Q, seed={:?}, tol={:e})",
            self.num_qubits, self.seed, self.tolerance
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
