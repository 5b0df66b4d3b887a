//! Parameter update strategies
//!
//! Variational drivers never change parameters themselves; they ask a
//! [`ParameterStrategy`] for the next candidate given the current parameters
//! and the loss history so far. Strategies are gradient-free.

use qlab_core::ParamVec;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Proposes the next parameter vector
pub trait ParameterStrategy: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Next parameters, same length as `current`.
    ///
    /// `loss_history` holds one entry per completed evaluation, oldest first.
    fn propose(&mut self, current: &[f64], loss_history: &[f64], rng: &mut dyn RngCore) -> ParamVec;
}

// ============================================================================
// Random Perturbation
// ============================================================================

/// Shift every parameter by a uniform draw in [−step/2, step/2)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomPerturbation {
    /// Width of the perturbation window
    pub step: f64,
}

impl RandomPerturbation {
    /// Create with perturbation width `step`
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl ParameterStrategy for RandomPerturbation {
    fn name(&self) -> &'static str {
        "random_perturbation"
    }

    fn propose(
        &mut self,
        current: &[f64],
        _loss_history: &[f64],
        rng: &mut dyn RngCore,
    ) -> ParamVec {
        current
            .iter()
            .map(|p| p + (rng.gen::<f64>() - 0.5) * self.step)
            .collect()
    }
}

// ============================================================================
// Uniform Sampling
// ============================================================================

/// Ignore the current point and draw every parameter uniformly from [low, high)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformSampling {
    /// Lower bound (inclusive)
    pub low: f64,
    /// Upper bound (exclusive)
    pub high: f64,
}

impl UniformSampling {
    /// Create over [low, high)
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Sampling over [0, π)
    pub fn half_turn() -> Self {
        Self::new(0.0, PI)
    }
}

impl ParameterStrategy for UniformSampling {
    fn name(&self) -> &'static str {
        "uniform_sampling"
    }

    fn propose(
        &mut self,
        current: &[f64],
        _loss_history: &[f64],
        rng: &mut dyn RngCore,
    ) -> ParamVec {
        let width = self.high - self.low;
        current
            .iter()
            .map(|_| self.low + rng.gen::<f64>() * width)
            .collect()
    }
}

// ============================================================================
// Decaying Perturbation
// ============================================================================

/// Random perturbation whose width shrinks by `decay` every time the latest
/// loss fails to beat the best earlier loss, down to `min_step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayingPerturbation {
    /// Current perturbation width
    pub step: f64,
    /// Multiplier applied on a non-improving evaluation
    pub decay: f64,
    /// Width floor
    pub min_step: f64,
}

impl DecayingPerturbation {
    /// Create with initial width, decay rate and floor
    pub fn new(step: f64, decay: f64, min_step: f64) -> Self {
        Self {
            step,
            decay,
            min_step,
        }
    }

    fn stalled(loss_history: &[f64]) -> bool {
        match loss_history.split_last() {
            Some((last, earlier)) if !earlier.is_empty() => {
                let best = earlier.iter().copied().fold(f64::INFINITY, f64::min);
                *last >= best
            }
            _ => false,
        }
    }
}

impl ParameterStrategy for DecayingPerturbation {
    fn name(&self) -> &'static str {
        "decaying_perturbation"
    }

    fn propose(
        &mut self,
        current: &[f64],
        loss_history: &[f64],
        rng: &mut dyn RngCore,
    ) -> ParamVec {
        if Self::stalled(loss_history) {
            self.step = (self.step * self.decay).max(self.min_step);
        }
        current
            .iter()
            .map(|p| p + (rng.gen::<f64>() - 0.5) * self.step)
            .collect()
    }
}

// ============================================================================
// Serializable Selection
// ============================================================================

/// Strategy selection carried by driver configs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// [`RandomPerturbation`]
    RandomPerturbation {
        /// Perturbation width
        step: f64,
    },
    /// [`UniformSampling`]
    UniformSampling {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },
    /// [`DecayingPerturbation`]
    DecayingPerturbation {
        /// Initial width
        step: f64,
        /// Decay rate
        decay: f64,
        /// Width floor
        min_step: f64,
    },
}

impl StrategyKind {
    /// Instantiate the strategy
    pub fn build(&self) -> Box<dyn ParameterStrategy> {
        match *self {
            StrategyKind::RandomPerturbation { step } => Box::new(RandomPerturbation::new(step)),
            StrategyKind::UniformSampling { low, high } => {
                Box::new(UniformSampling::new(low, high))
            }
            StrategyKind::DecayingPerturbation {
                step,
                decay,
                min_step,
            } => Box::new(DecayingPerturbation::new(step, decay, min_step)),
        }
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            StrategyKind::RandomPerturbation { step } => {
                if !(step > 0.0 && step.is_finite()) {
                    return Err(format!("perturbation step must be > 0, got {}", step));
                }
            }
            StrategyKind::UniformSampling { low, high } => {
                if !(low.is_finite() && high.is_finite() && high > low) {
                    return Err(format!("sampling range [{}, {}) is empty", low, high));
                }
            }
            StrategyKind::DecayingPerturbation {
                step,
                decay,
                min_step,
            } => {
                if !(step > 0.0 && step.is_finite()) {
                    return Err(format!("perturbation step must be > 0, got {}", step));
                }
                if !(decay > 0.0 && decay <= 1.0) {
                    return Err(format!("decay must be in (0, 1], got {}", decay));
                }
                if !(min_step >= 0.0 && min_step <= step) {
                    return Err(format!("min_step must be in [0, step], got {}", min_step));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::RandomPerturbation { step } => write!(f, "perturb(±{:.3})", step / 2.0),
            StrategyKind::UniformSampling { low, high } => {
                write!(f, "uniform[{:.3}, {:.3})", low, high)
            }
            StrategyKind::DecayingPerturbation { step, decay, .. } => {
                write!(f, "decay(step={:.3}, rate={:.2})", step, decay)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_perturbation_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut strategy = RandomPerturbation::new(0.1);
        let current = vec![1.0, -2.0, 0.5];

        for _ in 0..100 {
            let next = strategy.propose(&current, &[], &mut rng);
            assert_eq!(next.len(), current.len());
            for (n, c) in next.iter().zip(&current) {
                assert!((n - c).abs() <= 0.05);
            }
        }
    }

    #[test]
    fn test_uniform_sampling_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut strategy = UniformSampling::half_turn();

        let next = strategy.propose(&[0.0; 8], &[], &mut rng);
        assert_eq!(next.len(), 8);
        assert!(next.iter().all(|p| (0.0..PI).contains(p)));
    }

    #[test]
    fn test_decaying_perturbation_shrinks_on_stall() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut strategy = DecayingPerturbation::new(0.4, 0.5, 0.1);

        // Improving history keeps the width
        strategy.propose(&[0.0], &[3.0, 2.0], &mut rng);
        assert_eq!(strategy.step, 0.4);

        // Stalled history halves it, down to the floor
        strategy.propose(&[0.0], &[2.0, 2.5], &mut rng);
        assert!((strategy.step - 0.2).abs() < 1e-12);
        strategy.propose(&[0.0], &[2.0, 2.5], &mut rng);
        strategy.propose(&[0.0], &[2.0, 2.5], &mut rng);
        assert!((strategy.step - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_kind_build_and_validate() {
        let kind = StrategyKind::RandomPerturbation { step: 0.1 };
        assert!(kind.validate().is_ok());
        assert_eq!(kind.build().name(), "random_perturbation");

        assert!(StrategyKind::UniformSampling { low: 1.0, high: 1.0 }
            .validate()
            .is_err());
        assert!(StrategyKind::DecayingPerturbation {
            step: 0.1,
            decay: 1.5,
            min_step: 0.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_same_seed_same_proposals() {
        let propose = || {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            RandomPerturbation::new(0.2).propose(&[0.0, 1.0], &[], &mut rng)
        };
        assert_eq!(propose(), propose());
    }
}
