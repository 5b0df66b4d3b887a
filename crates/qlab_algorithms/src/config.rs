//! Driver configuration
//!
//! One builder-style struct per driver. Every field has a default from
//! `qlab_core::constants::algorithms`, so partial JSON documents load.

use crate::strategy::StrategyKind;
use qlab_core::algorithms::*;
use qlab_core::engine::MAX_QUBITS;
use qlab_core::{QlabError, QlabResult};
use qlab_engine::Simulator;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

fn check_register(num_qubits: usize) -> Result<(), String> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(format!(
            "num_qubits must be in [1, {}], got {}",
            MAX_QUBITS, num_qubits
        ));
    }
    Ok(())
}

/// Engine for a driver: seeded ChaCha8 when `seed` is set, entropy otherwise
pub(crate) fn driver_simulator(num_qubits: usize, seed: Option<u64>) -> QlabResult<Simulator> {
    match seed {
        Some(s) => Simulator::seeded(num_qubits, s),
        None => Simulator::new(num_qubits),
    }
}

macro_rules! json_io {
    ($ty:ty) => {
        impl $ty {
            /// Parse from JSON
            pub fn from_json(json: &str) -> QlabResult<Self> {
                Ok(serde_json::from_str(json)?)
            }

            /// Serialize to JSON
            pub fn to_json(&self) -> QlabResult<String> {
                Ok(serde_json::to_string_pretty(self)?)
            }

            /// `validate()` mapped into the crate error
            pub(crate) fn checked(&self) -> QlabResult<()> {
                self.validate().map_err(QlabError::InvalidConfig)
            }
        }
    };
}

// ============================================================================
// Factoring
// ============================================================================

/// Factoring driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorConfig {
    /// Engine register size
    pub num_qubits: usize,

    /// Qubits placed in superposition during period finding
    pub counting_qubits: usize,

    /// Random bases tried before giving up
    pub max_attempts: usize,

    /// Random seed (entropy when absent)
    pub seed: Option<u64>,
}

impl ShorConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self {
            num_qubits: SHOR_QUBITS,
            counting_qubits: SHOR_COUNTING_QUBITS,
            max_attempts: SHOR_MAX_ATTEMPTS,
            seed: None,
        }
    }

    /// Set register size
    pub fn with_qubits(mut self, n: usize) -> Self {
        self.num_qubits = n;
        self
    }

    /// Set counting register size
    pub fn with_counting_qubits(mut self, n: usize) -> Self {
        self.counting_qubits = n;
        self
    }

    /// Set attempt budget
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        check_register(self.num_qubits)?;
        if self.counting_qubits == 0 || self.counting_qubits > self.num_qubits {
            return Err(format!(
                "counting_qubits must be in [1, {}], got {}",
                self.num_qubits, self.counting_qubits
            ));
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be >= 1".to_string());
        }
        Ok(())
    }
}

json_io!(ShorConfig);

impl Default for ShorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShorConfig({}Q, counting={}, attempts={}, seed={:?})",
            self.num_qubits, self.counting_qubits, self.max_attempts, self.seed
        )
    }
}

// ============================================================================
// Search
// ============================================================================

/// Search driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroverConfig {
    /// Register size; the search space has 2ⁿ entries
    pub num_qubits: usize,

    /// Amplification rounds (⌊π/4·√N⌋ when absent)
    pub iterations: Option<usize>,

    /// Random seed (entropy when absent)
    pub seed: Option<u64>,
}

impl GroverConfig {
    /// Configuration for an `num_qubits` search space
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            iterations: None,
            seed: None,
        }
    }

    /// Set register size
    pub fn with_qubits(mut self, n: usize) -> Self {
        self.num_qubits = n;
        self
    }

    /// Override the number of amplification rounds
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = Some(n);
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rounds actually run
    pub fn effective_iterations(&self) -> usize {
        self.iterations
            .unwrap_or_else(|| grover_iterations(self.num_qubits))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        check_register(self.num_qubits)
    }
}

json_io!(GroverConfig);

impl Default for GroverConfig {
    fn default() -> Self {
        Self::new(GROVER_QUBITS)
    }
}

impl fmt::Display for GroverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroverConfig({}Q, iterations={}, seed={:?})",
            self.num_qubits,
            self.effective_iterations(),
            self.seed
        )
    }
}

// ============================================================================
// QAOA
// ============================================================================

/// Optimizer driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaoaConfig {
    /// Register size (one qubit per problem variable)
    pub num_qubits: usize,

    /// Parameter proposals evaluated per solve
    pub iterations: usize,

    /// Cost/mixer layers used by `solve_default`
    pub layers: usize,

    /// Proposal strategy for [γ…, β…]
    pub strategy: StrategyKind,

    /// Random seed (entropy when absent)
    pub seed: Option<u64>,
}

impl QaoaConfig {
    /// Configuration for `num_qubits` variables
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            iterations: QAOA_ITERATIONS,
            layers: QAOA_LAYERS,
            strategy: StrategyKind::UniformSampling { low: 0.0, high: PI },
            seed: None,
        }
    }

    /// Set register size
    pub fn with_qubits(mut self, n: usize) -> Self {
        self.num_qubits = n;
        self
    }

    /// Set proposal count
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Set default layer count
    pub fn with_layers(mut self, p: usize) -> Self {
        self.layers = p;
        self
    }

    /// Set proposal strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        check_register(self.num_qubits)?;
        if self.iterations == 0 {
            return Err("iterations must be >= 1".to_string());
        }
        if self.layers == 0 {
            return Err("layers must be >= 1".to_string());
        }
        self.strategy.validate()
    }
}

json_io!(QaoaConfig);

impl Default for QaoaConfig {
    fn default() -> Self {
        Self::new(QAOA_QUBITS)
    }
}

impl fmt::Display for QaoaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QaoaConfig({}Q, p={}, iterations={}, strategy={}, seed={:?})",
            self.num_qubits, self.layers, self.iterations, self.strategy, self.seed
        )
    }
}

// ============================================================================
// Learning
// ============================================================================

/// Classifier and clustering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QmlConfig {
    /// Perturbation width of the default strategy
    pub learning_rate: f64,

    /// Proposal strategy (random perturbation of width `learning_rate` when absent)
    pub strategy: Option<StrategyKind>,

    /// Epochs used by `train_classifier_default`
    pub epochs: usize,

    /// Pass cap used by `kmeans_default`
    pub kmeans_max_iterations: usize,

    /// Random seed (entropy when absent)
    pub seed: Option<u64>,
}

impl QmlConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self {
            learning_rate: QML_LEARNING_RATE,
            strategy: None,
            epochs: QML_EPOCHS,
            kmeans_max_iterations: KMEANS_MAX_ITERATIONS,
            seed: None,
        }
    }

    /// Set perturbation width
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set proposal strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set default epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set default k-means pass cap
    pub fn with_kmeans_max_iterations(mut self, n: usize) -> Self {
        self.kmeans_max_iterations = n;
        self
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Strategy actually used
    pub fn effective_strategy(&self) -> StrategyKind {
        self.strategy.unwrap_or(StrategyKind::RandomPerturbation {
            step: self.learning_rate,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(format!(
                "learning_rate must be > 0, got {}",
                self.learning_rate
            ));
        }
        if self.epochs == 0 {
            return Err("epochs must be >= 1".to_string());
        }
        if self.kmeans_max_iterations == 0 {
            return Err("kmeans_max_iterations must be >= 1".to_string());
        }
        self.effective_strategy().validate()
    }
}

json_io!(QmlConfig);

impl Default for QmlConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QmlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QmlConfig(lr={}, strategy={}, seed={:?})",
            self.learning_rate,
            self.effective_strategy(),
            self.seed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let shor = ShorConfig::default();
        assert_eq!(shor.num_qubits, 8);
        assert_eq!(shor.counting_qubits, 4);
        assert_eq!(shor.max_attempts, 10);

        let grover = GroverConfig::default();
        assert_eq!(grover.num_qubits, 3);
        assert_eq!(grover.effective_iterations(), 2);

        assert_eq!(QaoaConfig::default().iterations, 50);
        assert_eq!(QaoaConfig::default().layers, 1);
        assert_eq!(QmlConfig::default().epochs, 100);
        assert_eq!(QmlConfig::default().kmeans_max_iterations, 50);
        assert_eq!(
            QmlConfig::default().effective_strategy(),
            StrategyKind::RandomPerturbation { step: 0.1 }
        );
    }

    #[test]
    fn test_validation() {
        let shor = ShorConfig::new();
        assert!(shor.clone().with_counting_qubits(9).validate().is_err());
        assert!(shor.with_max_attempts(0).validate().is_err());

        assert!(GroverConfig::new(0).validate().is_err());
        assert!(GroverConfig::new(MAX_QUBITS + 1).validate().is_err());

        let qaoa = QaoaConfig::new(4);
        assert!(qaoa.clone().with_iterations(0).validate().is_err());
        assert!(qaoa.with_layers(0).validate().is_err());

        let qml = QmlConfig::new();
        assert!(qml.clone().with_learning_rate(-1.0).validate().is_err());
        assert!(qml.clone().with_epochs(0).validate().is_err());
        assert!(qml.with_kmeans_max_iterations(0).validate().is_err());

        let err = QaoaConfig::new(0).checked().unwrap_err();
        assert!(matches!(err, QlabError::InvalidConfig(_)));
    }

    #[test]
    fn test_partial_json() {
        let config = GroverConfig::from_json(r#"{"num_qubits": 4, "seed": 3}"#).unwrap();
        assert_eq!(config, GroverConfig::new(4).with_seed(3));
        assert_eq!(config.effective_iterations(), 3);

        let qaoa = QaoaConfig::new(3).with_seed(9);
        let restored = QaoaConfig::from_json(&qaoa.to_json().unwrap()).unwrap();
        assert_eq!(restored, qaoa);
    }

    #[test]
    fn test_display() {
        let text = ShorConfig::new().with_seed(1).to_string();
        assert!(text.starts_with("ShorConfig(8Q"));
        assert!(QmlConfig::new().to_string().contains("perturb"));
    }
}
