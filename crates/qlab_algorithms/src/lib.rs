//! # qlab Algorithms
//!
//! Algorithm drivers built on the state-vector engine. Each driver owns a
//! private [`qlab_engine::Simulator`] and talks to it only through apply,
//! measure, probabilities and reset.
//!
//! ## Architecture
//!
//! ```text
//! qlab_algorithms
//!     circuits   // Hadamard layers, multi-controlled phase, ZZ interaction
//!     strategy   // ParameterStrategy + random/uniform/decaying proposals
//!     cancel     // CancelToken polled once per iteration
//!     config     // ShorConfig, GroverConfig, QaoaConfig, QmlConfig
//!     shor       // factoring with classical order finding
//!     grover     // amplitude amplification search
//!     qaoa       // ZZ cost + Rx mixer, gradient-free angle search
//!     qml        // variational classifier, quantum k-means
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qlab_algorithms::prelude::*;
//!
//! let mut grover = GroverAlgorithm::seeded(3, 42).unwrap();
//! let result = grover.search(5).unwrap();
//! assert!(result.found);
//!
//! let mut shor = ShorAlgorithm::seeded(42).unwrap();
//! let result = shor.factor(15).unwrap();
//! assert_eq!(result.factors[0] * result.factors[1], 15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Cooperative cancellation
pub mod cancel;

/// Composite gate sequences
pub mod circuits;

/// Driver configuration
pub mod config;

/// Parameter proposal strategies
pub mod strategy;

/// Factoring
pub mod shor;

/// Search
pub mod grover;

/// QAOA optimizer
pub mod qaoa;

/// Classifier and clustering
pub mod qml;

// ============================================================================
// Re-exports
// ============================================================================

pub use cancel::CancelToken;
pub use config::{GroverConfig, QaoaConfig, QmlConfig, ShorConfig};
pub use grover::{GroverAlgorithm, GroverResult};
pub use qaoa::{QaoaAlgorithm, QaoaParameters, QaoaResult};
pub use qml::{
    ClassificationResult, ClusteringResult, DataPoint, QmlModel, QuantumMachineLearning,
};
pub use shor::{ShorAlgorithm, ShorResult};
pub use strategy::{
    DecayingPerturbation, ParameterStrategy, RandomPerturbation, StrategyKind, UniformSampling,
};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qlab_algorithms::prelude::*;
    //! ```

    pub use crate::cancel::CancelToken;
    pub use crate::config::{GroverConfig, QaoaConfig, QmlConfig, ShorConfig};
    pub use crate::grover::{GroverAlgorithm, GroverResult};
    pub use crate::qaoa::{QaoaAlgorithm, QaoaParameters, QaoaResult};
    pub use crate::qml::{
        ClassificationResult, ClusteringResult, DataPoint, QmlModel, QuantumMachineLearning,
    };
    pub use crate::shor::{ShorAlgorithm, ShorResult};
    pub use crate::strategy::{
        DecayingPerturbation, ParameterStrategy, RandomPerturbation, StrategyKind, UniformSampling,
    };
    pub use qlab_engine::prelude::*;
}

// ============================================================================
// Integration Tests
// ============================================================================
