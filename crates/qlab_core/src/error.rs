//! Error types for qlab
//!
//! A single error enum shared by the engine and every algorithm driver.
//! Most variants are contract violations (bad qubit index, bad arity,
//! degenerate state); they are reported, never retried.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for qlab
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QlabError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Register size outside [1, max]
    #[error("Invalid qubit count {count}: must be in range [1, {max}]")]
    InvalidQubitCount { count: usize, max: usize },

    /// Qubit index out of range
    #[error("Qubit {qubit} out of range: register has {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Control and target refer to the same qubit
    #[error("Qubit {0} used as both control and target")]
    DuplicateQubit(usize),

    /// Number of targets does not match the gate kind
    #[error("Gate {gate} expects {expected} target(s), got {got}")]
    ArityMismatch {
        gate: String,
        expected: usize,
        got: usize,
    },

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Normalization of a zero-magnitude (or non-finite) vector
    #[error("Degenerate state: amplitude vector has zero or non-finite norm")]
    DegenerateState,

    // ========================================================================
    // Driver Errors
    // ========================================================================
    /// Configuration rejected by `validate()`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data rejected by a driver
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Run interrupted through a cancel token
    #[error("Cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for qlab operations
pub type QlabResult<T> = Result<T, QlabError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QlabError {
    fn from(err: serde_json::Error) -> Self {
        QlabError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QlabError {
    /// Check if error is a caller-side validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QlabError::InvalidQubitCount { .. }
                | QlabError::QubitOutOfRange { .. }
                | QlabError::DuplicateQubit(_)
                | QlabError::ArityMismatch { .. }
                | QlabError::InvalidConfig(_)
                | QlabError::InvalidInput(_)
        )
    }

    /// Check if error is a violation of the engine contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            QlabError::InvalidQubitCount { .. }
                | QlabError::QubitOutOfRange { .. }
                | QlabError::DuplicateQubit(_)
                | QlabError::ArityMismatch { .. }
                | QlabError::DegenerateState
        )
    }

    /// Check if the run was interrupted rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QlabError::Cancelled { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
