//! Constants for qlab
//!
//! Engine limits and default parameters for the algorithm drivers.

// ============================================================================
// Engine Constants
// ============================================================================

pub mod engine {
    //! State-vector engine limits and tolerances

    /// Largest supported register (2^16 amplitudes)
    pub const MAX_QUBITS: usize = 16;

    /// Tolerance for the normalization invariant Σ|a|² = 1
    pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

    /// Squared norms at or below this are treated as a zero vector
    pub const DEGENERATE_NORM_SQR: f64 = 1e-300;

    /// Number of amplitudes for a register of `num_qubits`
    #[inline]
    pub const fn dimension(num_qubits: usize) -> usize {
        1 << num_qubits
    }
}

// ============================================================================
// Algorithm Constants
// ============================================================================

pub mod algorithms {
    //! Defaults for the four algorithm drivers

    /// Register size used by the factoring driver
    pub const SHOR_QUBITS: usize = 8;

    /// Width of the Hadamard counting register inside the factoring register
    pub const SHOR_COUNTING_QUBITS: usize = 4;

    /// Random base draws before the factoring driver gives up
    pub const SHOR_MAX_ATTEMPTS: usize = 10;

    /// Default search register size
    pub const GROVER_QUBITS: usize = 3;

    /// Target probability above which a search counts as found
    pub const GROVER_SUCCESS_THRESHOLD: f64 = 0.5;

    /// Default QAOA register size
    pub const QAOA_QUBITS: usize = 4;

    /// Parameter samples evaluated by the QAOA driver
    pub const QAOA_ITERATIONS: usize = 50;

    /// Default QAOA depth p
    pub const QAOA_LAYERS: usize = 1;

    /// Minimum register size for the learning driver
    pub const QML_MIN_QUBITS: usize = 4;

    /// Rotation angles per qubit per variational layer (Ry, Rz, Ry)
    pub const QML_PARAMS_PER_QUBIT: usize = 3;

    /// Default classifier training epochs
    pub const QML_EPOCHS: usize = 100;

    /// Default perturbation width for parameter updates
    pub const QML_LEARNING_RATE: f64 = 0.1;

    /// Default iteration cap for k-means
    pub const KMEANS_MAX_ITERATIONS: usize = 50;

    /// Optimal Grover iteration count ⌊π/4 · √N⌋ for an n-qubit register
    pub fn grover_iterations(num_qubits: usize) -> usize {
        let n = (1usize << num_qubits) as f64;
        ((std::f64::consts::PI / 4.0) * n.sqrt()).floor() as usize
    }

    /// Learning register size: max(4, ⌈log2(features)⌉ + 2)
    pub fn qml_qubits(num_features: usize) -> usize {
        let bits = if num_features <= 1 {
            0
        } else {
            (usize::BITS - (num_features - 1).leading_zeros()) as usize
        };
        QML_MIN_QUBITS.max(bits + 2)
    }
}

// ============================================================================
// Tests
// ============================================================================
