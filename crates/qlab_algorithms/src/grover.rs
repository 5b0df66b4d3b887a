//! Amplitude-amplification search driver
//!
//! Marks one basis state with a phase oracle and amplifies it by inversion
//! about the mean. Both reflections are multi-controlled Z gates conjugated
//! by X and H layers.

use crate::cancel::CancelToken;
use crate::circuits::{flip_zeros, hadamard_all, multi_controlled_z};
use crate::config::{driver_simulator, GroverConfig};
use log::{debug, info};
use qlab_core::algorithms::GROVER_SUCCESS_THRESHOLD;
use qlab_core::{QlabError, QlabResult, QubitId};
use qlab_engine::{QuantumState, Simulator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a search, or a snapshot of one in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverResult {
    /// Marked basis index
    pub target: usize,

    /// Amplification rounds applied
    pub iterations: usize,

    /// Probability of measuring the target
    pub probability: f64,

    /// `probability >= 0.5`
    pub found: bool,
}

impl GroverResult {
    /// Serialize to JSON
    pub fn to_json(&self) -> QlabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for GroverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target {} after {} iterations: p = {:.4}{}",
            self.target,
            self.iterations,
            self.probability,
            if self.found { " (found)" } else { "" }
        )
    }
}

/// Search driver
pub struct GroverAlgorithm {
    config: GroverConfig,
    simulator: Simulator,
    qubits: Vec<QubitId>,
}

impl GroverAlgorithm {
    /// Create from a validated configuration
    pub fn new(config: GroverConfig) -> QlabResult<Self> {
        config.checked()?;
        let simulator = driver_simulator(config.num_qubits, config.seed)?;
        let qubits = (0..config.num_qubits).collect();
        Ok(Self {
            config,
            simulator,
            qubits,
        })
    }

    /// `num_qubits` search space with a fixed seed
    pub fn seeded(num_qubits: usize, seed: u64) -> QlabResult<Self> {
        Self::new(GroverConfig::new(num_qubits).with_seed(seed))
    }

    /// Run the full search for `target`
    pub fn search(&mut self, target: usize) -> QlabResult<GroverResult> {
        self.search_with_cancel(target, &CancelToken::new())
    }

    /// Run the full search, polling `cancel` before each round
    pub fn search_with_cancel(
        &mut self,
        target: usize,
        cancel: &CancelToken,
    ) -> QlabResult<GroverResult> {
        let mut last = None;
        self.run(target, cancel, |step| last = Some(step))?;
        last.ok_or_else(|| QlabError::InternalError("search produced no result".to_string()))
    }

    /// Snapshots after the initial superposition and after every round
    pub fn search_with_steps(&mut self, target: usize) -> QlabResult<Vec<GroverResult>> {
        let mut steps = Vec::with_capacity(self.config.effective_iterations() + 1);
        self.run(target, &CancelToken::new(), |step| steps.push(step))?;
        Ok(steps)
    }

    fn run<F>(&mut self, target: usize, cancel: &CancelToken, mut on_step: F) -> QlabResult<()>
    where
        F: FnMut(GroverResult),
    {
        let size = self.simulator.dimension();
        if target >= size {
            return Err(QlabError::InvalidInput(format!(
                "target {} outside search space of {}",
                target, size
            )));
        }

        let rounds = self.config.effective_iterations();
        info!(
            "Searching for {} in {} entries ({} rounds)",
            target, size, rounds
        );

        self.simulator.reset();
        hadamard_all(&mut self.simulator)?;
        on_step(self.snapshot(target, 0));

        for round in 1..=rounds {
            cancel.check(round - 1)?;
            self.oracle(target)?;
            self.diffusion()?;

            let step = self.snapshot(target, round);
            debug!("Round {}: p(target) = {:.4}", round, step.probability);
            on_step(step);
        }

        info!(
            "Search finished: p(target) = {:.4}",
            self.simulator.probabilities()[target]
        );
        Ok(())
    }

    /// Phase-flip |target⟩
    fn oracle(&mut self, target: usize) -> QlabResult<()> {
        flip_zeros(&mut self.simulator, &self.qubits, target)?;
        multi_controlled_z(&mut self.simulator, &self.qubits)?;
        flip_zeros(&mut self.simulator, &self.qubits, target)
    }

    /// Inversion about the mean
    fn diffusion(&mut self) -> QlabResult<()> {
        hadamard_all(&mut self.simulator)?;
        flip_zeros(&mut self.simulator, &self.qubits, 0)?;
        multi_controlled_z(&mut self.simulator, &self.qubits)?;
        flip_zeros(&mut self.simulator, &self.qubits, 0)?;
        hadamard_all(&mut self.simulator)
    }

    fn snapshot(&self, target: usize, iterations: usize) -> GroverResult {
        let probability = self.simulator.probabilities()[target];
        GroverResult {
            target,
            iterations,
            probability,
            found: probability >= GROVER_SUCCESS_THRESHOLD,
        }
    }

    /// Snapshot of the engine
    pub fn quantum_state(&self) -> QuantumState {
        self.simulator.state()
    }

    /// Active configuration
    pub fn config(&self) -> &GroverConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
