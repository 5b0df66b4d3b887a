//! Integer factoring driver
//!
//! Shor-style factoring with classical order finding. The engine only
//! prepares and unprepares the counting register around each period search;
//! the order itself comes from modular exponentiation.

use crate::cancel::CancelToken;
use crate::circuits::hadamard_layer;
use crate::config::{driver_simulator, ShorConfig};
use log::{debug, info};
use qlab_core::{QlabResult, QubitId};
use qlab_engine::{QuantumState, Simulator};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Result
// ============================================================================

/// Outcome of one `factor` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShorResult {
    /// Number that was factored
    pub n: u64,

    /// Two nontrivial factors on success, empty otherwise
    pub factors: Vec<u64>,

    /// Attempts consumed
    pub iterations: usize,

    /// Whether a nontrivial split was found
    pub success: bool,
}

impl ShorResult {
    fn failure(n: u64, iterations: usize) -> Self {
        Self {
            n,
            factors: Vec::new(),
            iterations,
            success: false,
        }
    }

    fn split(n: u64, factor: u64, iterations: usize) -> Self {
        Self {
            n,
            factors: vec![factor, n / factor],
            iterations,
            success: true,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QlabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ShorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "{} = {} × {} ({} iterations)",
                self.n, self.factors[0], self.factors[1], self.iterations
            )
        } else {
            write!(f, "{}: no factors ({} iterations)", self.n, self.iterations)
        }
    }
}

// ============================================================================
// Number Theory
// ============================================================================

/// Greatest common divisor
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// base^exp mod modulus
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut b = base as u128 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        exp >>= 1;
        b = b * b % m;
    }
    result as u64
}

/// Smallest r in [1, n) with a^r ≡ 1 (mod n), or 1 when there is none
pub fn find_period(a: u64, n: u64) -> u64 {
    (1..n).find(|&r| mod_pow(a, r, n) == 1).unwrap_or(1)
}

// ============================================================================
// Driver
// ============================================================================

/// Factoring driver
pub struct ShorAlgorithm {
    config: ShorConfig,
    simulator: Simulator,
}

impl ShorAlgorithm {
    /// Create from a validated configuration
    pub fn new(config: ShorConfig) -> QlabResult<Self> {
        config.checked()?;
        let simulator = driver_simulator(config.num_qubits, config.seed)?;
        Ok(Self { config, simulator })
    }

    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> QlabResult<Self> {
        Self::new(ShorConfig::new().with_seed(seed))
    }

    /// Factor `n`
    pub fn factor(&mut self, n: u64) -> QlabResult<ShorResult> {
        self.factor_with_cancel(n, &CancelToken::new())
    }

    /// Factor `n`, polling `cancel` before each attempt
    pub fn factor_with_cancel(&mut self, n: u64, cancel: &CancelToken) -> QlabResult<ShorResult> {
        info!("Factoring {} ({})", n, self.config);

        if n < 4 {
            return Ok(ShorResult::failure(n, 0));
        }
        if n % 2 == 0 {
            return Ok(ShorResult::split(n, 2, 1));
        }

        let mut iterations = 0;
        while iterations < self.config.max_attempts {
            cancel.check(iterations)?;
            iterations += 1;

            let a = self.simulator.rng_mut().gen_range(2..n - 1);
            let common = gcd(a, n);
            if common > 1 {
                debug!("Attempt {}: gcd({}, {}) = {}", iterations, a, n, common);
                let result = ShorResult::split(n, common, iterations);
                info!("{}", result);
                return Ok(result);
            }

            let r = self.period_finding(a, n)?;
            debug!("Attempt {}: a = {}, period = {}", iterations, a, r);

            if r % 2 == 0 {
                let x = mod_pow(a, r / 2, n);
                for candidate in [gcd((x + n - 1) % n, n), gcd((x + 1) % n, n)] {
                    if candidate > 1 && candidate < n {
                        let result = ShorResult::split(n, candidate, iterations);
                        info!("{}", result);
                        return Ok(result);
                    }
                }
            }
        }

        info!("No factors of {} after {} attempts", n, iterations);
        Ok(ShorResult::failure(n, iterations))
    }

    /// Prepare the counting register, find the order of `a`, unprepare
    fn period_finding(&mut self, a: u64, n: u64) -> QlabResult<u64> {
        let counting: Vec<QubitId> = (0..self.config.counting_qubits).collect();

        self.simulator.reset();
        hadamard_layer(&mut self.simulator, &counting)?;
        let r = find_period(a, n);
        hadamard_layer(&mut self.simulator, &counting)?;

        Ok(r)
    }

    /// Snapshot of the engine
    pub fn quantum_state(&self) -> QuantumState {
        self.simulator.state()
    }

    /// Active configuration
    pub fn config(&self) -> &ShorConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
