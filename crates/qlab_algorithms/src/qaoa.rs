//! QAOA optimizer driver
//!
//! Minimizes Σ_{i<j} wᵢⱼ·sᵢ·sⱼ over binary strings s. Each round a
//! [`ParameterStrategy`] proposes [γ₁…γₚ, β₁…βₚ]; the circuit alternates ZZ
//! cost interactions with an Rx mixer, and the most probable basis state is
//! scored classically.

use crate::cancel::CancelToken;
use crate::circuits::{hadamard_all, zz_interaction};
use crate::config::{driver_simulator, QaoaConfig};
use crate::strategy::ParameterStrategy;
use log::{debug, info};
use qlab_core::types::index_to_bits;
use qlab_core::{Angle, Gate, QlabError, QlabResult};
use qlab_engine::{QuantumState, Simulator};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance for the cost matrix symmetry check
const SYMMETRY_TOLERANCE: f64 = 1e-12;

// ============================================================================
// Result Types
// ============================================================================

/// Per-layer angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaoaParameters {
    /// Cost angles γ
    pub gamma: Vec<Angle>,
    /// Mixer angles β
    pub beta: Vec<Angle>,
}

impl QaoaParameters {
    fn from_flat(flat: &[f64], layers: usize) -> Self {
        Self {
            gamma: flat[..layers].to_vec(),
            beta: flat[layers..].to_vec(),
        }
    }
}

/// Outcome of `solve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaoaResult {
    /// Lowest-cost assignment seen; entry i is qubit i
    pub best_solution: Vec<u8>,

    /// Cost of `best_solution`
    pub energy: f64,

    /// Angles that produced it
    pub parameters: QaoaParameters,

    /// Proposals evaluated
    pub iterations: usize,
}

impl QaoaResult {
    /// Serialize to JSON
    pub fn to_json(&self) -> QlabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for QaoaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = self
            .best_solution
            .iter()
            .map(|b| if *b == 1 { '1' } else { '0' })
            .collect();
        write!(
            f,
            "solution [{}] energy {:.4} after {} iterations",
            bits, self.energy, self.iterations
        )
    }
}

// ============================================================================
// Driver
// ============================================================================

/// QAOA optimizer
pub struct QaoaAlgorithm {
    config: QaoaConfig,
    simulator: Simulator,
    cost_matrix: Vec<Vec<f64>>,
    strategy: Box<dyn ParameterStrategy>,
}

impl QaoaAlgorithm {
    /// Create from a configuration and an optional cost matrix
    ///
    /// Without a matrix, symmetric weights are drawn uniformly from [−1, 1)
    /// using the driver's random source.
    pub fn new(config: QaoaConfig, cost_matrix: Option<Vec<Vec<f64>>>) -> QlabResult<Self> {
        config.checked()?;
        let mut simulator = driver_simulator(config.num_qubits, config.seed)?;

        let cost_matrix = match cost_matrix {
            Some(m) => {
                validate_cost_matrix(&m, config.num_qubits)?;
                m
            }
            None => random_cost_matrix(config.num_qubits, simulator.rng_mut()),
        };

        let strategy = config.strategy.build();
        Ok(Self {
            config,
            simulator,
            cost_matrix,
            strategy,
        })
    }

    /// Replace the proposal strategy
    pub fn with_strategy(mut self, strategy: Box<dyn ParameterStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run the optimizer with `layers` cost/mixer layers
    pub fn solve(&mut self, layers: usize) -> QlabResult<QaoaResult> {
        self.solve_with_cancel(layers, &CancelToken::new())
    }

    /// Run the optimizer with the configured layer count
    pub fn solve_default(&mut self) -> QlabResult<QaoaResult> {
        self.solve(self.config.layers)
    }

    /// Run the optimizer, polling `cancel` before each proposal
    pub fn solve_with_cancel(
        &mut self,
        layers: usize,
        cancel: &CancelToken,
    ) -> QlabResult<QaoaResult> {
        if layers == 0 {
            return Err(QlabError::InvalidInput(
                "QAOA needs at least one layer".to_string(),
            ));
        }

        info!(
            "QAOA on {} variables, p = {}, strategy = {}",
            self.config.num_qubits,
            layers,
            self.strategy.name()
        );

        let mut current = vec![0.0; 2 * layers];
        let mut history = Vec::with_capacity(self.config.iterations);
        let mut best: Option<(f64, Vec<u8>, Vec<f64>)> = None;

        for iteration in 0..self.config.iterations {
            cancel.check(iteration)?;

            let proposal = self
                .strategy
                .propose(&current, &history, self.simulator.rng_mut());
            if proposal.len() != 2 * layers {
                return Err(QlabError::InternalError(format!(
                    "strategy {} proposed {} parameters, expected {}",
                    self.strategy.name(),
                    proposal.len(),
                    2 * layers
                )));
            }

            let (solution, energy) = self.run_circuit(&proposal[..layers], &proposal[layers..])?;
            debug!(
                "Iteration {}: energy {:.4} for {:?}",
                iteration, energy, solution
            );
            history.push(energy);

            let improved = best.as_ref().map_or(true, |(e, _, _)| energy < *e);
            if improved {
                best = Some((energy, solution, proposal.clone()));
                current = proposal;
            }
        }

        let (energy, best_solution, flat) = best.ok_or_else(|| {
            QlabError::InternalError("no QAOA iterations ran".to_string())
        })?;
        let result = QaoaResult {
            best_solution,
            energy,
            parameters: QaoaParameters::from_flat(&flat, layers),
            iterations: self.config.iterations,
        };
        info!("QAOA finished: {}", result);
        Ok(result)
    }

    /// Prepare the QAOA state for the given angles and score its mode
    fn run_circuit(&mut self, gamma: &[Angle], beta: &[Angle]) -> QlabResult<(Vec<u8>, f64)> {
        let n = self.config.num_qubits;

        self.simulator.reset();
        hadamard_all(&mut self.simulator)?;

        for (g, b) in gamma.iter().zip(beta) {
            for i in 0..n {
                for j in (i + 1)..n {
                    let w = self.cost_matrix[i][j];
                    if w != 0.0 {
                        zz_interaction(&mut self.simulator, i, j, 2.0 * g * w)?;
                    }
                }
            }
            let mixer = Gate::rx(2.0 * b);
            for q in 0..n {
                self.simulator.apply(&mixer, &[q])?;
            }
        }

        let index = self.simulator.state().most_probable();
        let solution = index_to_bits(index, n);
        let energy = self.evaluate_cost(&solution);
        Ok((solution, energy))
    }

    /// Σ_{i<j} wᵢⱼ·sᵢ·sⱼ
    pub fn evaluate_cost(&self, solution: &[u8]) -> f64 {
        let n = self.config.num_qubits.min(solution.len());
        let mut cost = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                cost += self.cost_matrix[i][j] * f64::from(solution[i]) * f64::from(solution[j]);
            }
        }
        cost
    }

    /// Current cost matrix
    pub fn cost_matrix(&self) -> &[Vec<f64>] {
        &self.cost_matrix
    }

    /// Replace the cost matrix (must be n×n, finite and symmetric)
    pub fn set_cost_matrix(&mut self, matrix: Vec<Vec<f64>>) -> QlabResult<()> {
        validate_cost_matrix(&matrix, self.config.num_qubits)?;
        self.cost_matrix = matrix;
        Ok(())
    }

    /// Snapshot of the engine
    pub fn quantum_state(&self) -> QuantumState {
        self.simulator.state()
    }

    /// Active configuration
    pub fn config(&self) -> &QaoaConfig {
        &self.config
    }
}

// ============================================================================
// Cost Matrix Helpers
// ============================================================================

fn random_cost_matrix<R: Rng>(n: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let w = rng.gen::<f64>() * 2.0 - 1.0;
            matrix[i][j] = w;
            matrix[j][i] = w;
        }
    }
    matrix
}

fn validate_cost_matrix(matrix: &[Vec<f64>], n: usize) -> QlabResult<()> {
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(QlabError::InvalidInput(format!(
            "cost matrix must be {}x{}",
            n, n
        )));
    }
    for i in 0..n {
        for j in 0..n {
            let w = matrix[i][j];
            if !w.is_finite() {
                return Err(QlabError::InvalidInput(format!(
                    "cost matrix entry ({}, {}) is not finite",
                    i, j
                )));
            }
            if (w - matrix[j][i]).abs() > SYMMETRY_TOLERANCE {
                return Err(QlabError::InvalidInput(format!(
                    "cost matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
