//! Variational classifier and quantum k-means
//!
//! Features in [0, 1] are angle-encoded with Ry(x·π), one qubit per feature
//! while qubits last. The classifier appends a Ry–Rz–Ry layer per qubit and
//! a CNOT chain, and reads P(|0…00⟩) − P(|0…01⟩) as its prediction.
//! Clustering measures distance between two feature vectors as the
//! probability of leaving |0…0⟩ after encoding one and un-encoding the other.

use crate::cancel::CancelToken;
use crate::config::{driver_simulator, QmlConfig};
use crate::strategy::ParameterStrategy;
use log::{debug, info};
use qlab_core::algorithms::{qml_qubits, QML_PARAMS_PER_QUBIT};
use qlab_core::{Gate, QlabError, QlabResult};
use qlab_engine::{QuantumState, Simulator};
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

// ============================================================================
// Data Types
// ============================================================================

/// Labelled feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Feature values, expected in [0, 1]
    pub features: Vec<f64>,
    /// Class label (0 or 1 for the classifier; ignored by k-means)
    pub label: i32,
}

impl DataPoint {
    /// Create a data point
    pub fn new(features: Vec<f64>, label: i32) -> Self {
        Self { features, label }
    }
}

/// Trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QmlModel {
    /// Best-accuracy parameters, three per qubit
    pub parameters: Vec<f64>,
    /// Training accuracy of `parameters`
    pub accuracy: f64,
    /// Epochs run
    pub epochs: usize,
    /// Mean absolute loss per epoch
    pub loss: Vec<f64>,
}

impl QmlModel {
    /// Serialize to JSON
    pub fn to_json(&self) -> QlabResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QlabResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for QmlModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QmlModel({} params, accuracy {:.1}%, {} epochs)",
            self.parameters.len(),
            self.accuracy * 100.0,
            self.epochs
        )
    }
}

/// Outcome of `classify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Rounded prediction per point
    pub predictions: Vec<i32>,
    /// Fraction of predictions equal to the label
    pub accuracy: f64,
    /// Model used
    pub model: QmlModel,
}

/// Outcome of `kmeans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Cluster index per point
    pub clusters: Vec<usize>,
    /// Final centroids
    pub centroids: Vec<Vec<f64>>,
    /// Assignment passes run
    pub iterations: usize,
}

macro_rules! result_json {
    ($($ty:ty),*) => {
        $(impl $ty {
            /// Serialize to JSON
            pub fn to_json(&self) -> QlabResult<String> {
                Ok(serde_json::to_string_pretty(self)?)
            }
        })*
    };
}

result_json!(ClassificationResult, ClusteringResult);

// ============================================================================
// Driver
// ============================================================================

/// Variational classifier and clustering driver
pub struct QuantumMachineLearning {
    config: QmlConfig,
    simulator: Simulator,
    num_features: usize,
    strategy: Box<dyn ParameterStrategy>,
}

impl QuantumMachineLearning {
    /// Create for `num_features`-dimensional data
    pub fn new(num_features: usize, config: QmlConfig) -> QlabResult<Self> {
        if num_features == 0 {
            return Err(QlabError::InvalidInput(
                "at least one feature is required".to_string(),
            ));
        }
        config.checked()?;
        let simulator = driver_simulator(qml_qubits(num_features), config.seed)?;
        let strategy = config.effective_strategy().build();
        Ok(Self {
            config,
            simulator,
            num_features,
            strategy,
        })
    }

    /// Default configuration with a fixed seed
    pub fn seeded(num_features: usize, seed: u64) -> QlabResult<Self> {
        Self::new(num_features, QmlConfig::new().with_seed(seed))
    }

    /// Replace the proposal strategy
    pub fn with_strategy(mut self, strategy: Box<dyn ParameterStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Register size
    pub fn num_qubits(&self) -> usize {
        self.simulator.num_qubits()
    }

    /// Parameters per model
    pub fn num_parameters(&self) -> usize {
        self.num_qubits() * QML_PARAMS_PER_QUBIT
    }

    // ========================================================================
    // Classifier
    // ========================================================================

    /// Train on `data` for `epochs` epochs
    pub fn train_classifier(&mut self, data: &[DataPoint], epochs: usize) -> QlabResult<QmlModel> {
        self.train_classifier_with_cancel(data, epochs, &CancelToken::new())
    }

    /// Train for the configured number of epochs
    pub fn train_classifier_default(&mut self, data: &[DataPoint]) -> QlabResult<QmlModel> {
        self.train_classifier(data, self.config.epochs)
    }

    /// Train, polling `cancel` before each epoch
    pub fn train_classifier_with_cancel(
        &mut self,
        data: &[DataPoint],
        epochs: usize,
        cancel: &CancelToken,
    ) -> QlabResult<QmlModel> {
        self.check_data(data)?;
        if epochs == 0 {
            return Err(QlabError::InvalidInput("epochs must be >= 1".to_string()));
        }

        info!(
            "Training classifier: {} points, {} qubits, {} epochs, strategy = {}",
            data.len(),
            self.num_qubits(),
            epochs,
            self.strategy.name()
        );

        let count = self.num_parameters();
        let rng = self.simulator.rng_mut();
        let mut parameters: Vec<f64> = (0..count).map(|_| rng.gen::<f64>() * 2.0 * PI).collect();
        let mut best_parameters = parameters.clone();
        let mut best_accuracy = 0.0;
        let mut loss_history = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            cancel.check(epoch)?;

            let mut total_loss = 0.0;
            let mut correct = 0usize;
            for point in data {
                let prediction = self.predict(&point.features, &parameters)?;
                total_loss += (prediction - f64::from(point.label)).abs();
                if prediction.round() as i32 == point.label {
                    correct += 1;
                }
            }

            let accuracy = correct as f64 / data.len() as f64;
            let loss = total_loss / data.len() as f64;
            loss_history.push(loss);
            debug!("Epoch {}: loss {:.4}, accuracy {:.3}", epoch, loss, accuracy);

            if accuracy > best_accuracy {
                best_accuracy = accuracy;
                best_parameters = parameters.clone();
            }

            parameters = self
                .strategy
                .propose(&parameters, &loss_history, self.simulator.rng_mut());
        }

        let model = QmlModel {
            parameters: best_parameters,
            accuracy: best_accuracy,
            epochs,
            loss: loss_history,
        };
        info!("Training finished: {}", model);
        Ok(model)
    }

    /// Classify `data` with a trained model
    pub fn classify(
        &mut self,
        data: &[DataPoint],
        model: &QmlModel,
    ) -> QlabResult<ClassificationResult> {
        self.check_data(data)?;
        self.check_parameters(&model.parameters)?;

        let mut predictions = Vec::with_capacity(data.len());
        let mut correct = 0usize;
        for point in data {
            let predicted = self.predict(&point.features, &model.parameters)?.round() as i32;
            if predicted == point.label {
                correct += 1;
            }
            predictions.push(predicted);
        }

        Ok(ClassificationResult {
            predictions,
            accuracy: correct as f64 / data.len() as f64,
            model: model.clone(),
        })
    }

    /// Raw prediction P(|0…00⟩) − P(|0…01⟩) for one feature vector
    pub fn predict(&mut self, features: &[f64], parameters: &[f64]) -> QlabResult<f64> {
        self.check_parameters(parameters)?;
        self.simulator.reset();
        self.encode(features)?;
        self.variational_layers(parameters)?;
        let probs = self.simulator.probabilities();
        Ok(probs[0] - probs[1])
    }

    fn encode(&mut self, features: &[f64]) -> QlabResult<()> {
        let n = self.num_qubits();
        for (q, x) in features.iter().take(n).enumerate() {
            self.simulator.apply(&Gate::ry(x * PI), &[q])?;
        }
        Ok(())
    }

    fn variational_layers(&mut self, parameters: &[f64]) -> QlabResult<()> {
        let n = self.num_qubits();
        for layer in parameters.chunks_exact(n * QML_PARAMS_PER_QUBIT) {
            for (q, angles) in layer.chunks_exact(QML_PARAMS_PER_QUBIT).enumerate() {
                self.simulator.apply(&Gate::ry(angles[0]), &[q])?;
                self.simulator.apply(&Gate::rz(angles[1]), &[q])?;
                self.simulator.apply(&Gate::ry(angles[2]), &[q])?;
            }
            for q in 0..n.saturating_sub(1) {
                self.simulator.apply_cnot(q, q + 1)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Clustering
    // ========================================================================

    /// k-means with engine-computed distances
    pub fn kmeans(
        &mut self,
        data: &[DataPoint],
        k: usize,
        max_iterations: usize,
    ) -> QlabResult<ClusteringResult> {
        self.kmeans_with_cancel(data, k, max_iterations, &CancelToken::new())
    }

    /// k-means capped at the configured number of passes
    pub fn kmeans_default(&mut self, data: &[DataPoint], k: usize) -> QlabResult<ClusteringResult> {
        self.kmeans(data, k, self.config.kmeans_max_iterations)
    }

    /// k-means, polling `cancel` before each assignment pass
    pub fn kmeans_with_cancel(
        &mut self,
        data: &[DataPoint],
        k: usize,
        max_iterations: usize,
        cancel: &CancelToken,
    ) -> QlabResult<ClusteringResult> {
        self.check_data(data)?;
        if k == 0 || k > data.len() {
            return Err(QlabError::InvalidInput(format!(
                "k must be in [1, {}], got {}",
                data.len(),
                k
            )));
        }
        if max_iterations == 0 {
            return Err(QlabError::InvalidInput(
                "max_iterations must be >= 1".to_string(),
            ));
        }

        info!("k-means: {} points, k = {}", data.len(), k);

        let mut centroids: Vec<Vec<f64>> = sample(self.simulator.rng_mut(), data.len(), k)
            .into_iter()
            .map(|i| data[i].features.clone())
            .collect();

        const UNASSIGNED: usize = usize::MAX;
        let mut clusters = vec![UNASSIGNED; data.len()];
        let mut iterations = 0;

        while iterations < max_iterations {
            cancel.check(iterations)?;
            iterations += 1;

            let mut changed = 0usize;
            for (i, point) in data.iter().enumerate() {
                let nearest = self.nearest_centroid(&point.features, &centroids)?;
                if clusters[i] != nearest {
                    clusters[i] = nearest;
                    changed += 1;
                }
            }
            debug!("Pass {}: {} reassignments", iterations, changed);

            if changed == 0 {
                break;
            }
            centroids = self.update_centroids(data, &clusters, k);
        }

        info!("k-means finished after {} passes", iterations);
        Ok(ClusteringResult {
            clusters,
            centroids,
            iterations,
        })
    }

    /// 1 − P(|0…0⟩) after Ry(aᵢπ) then Ry(−bᵢπ) on qubit i
    ///
    /// Zero for identical vectors; per feature the overlap is cos²((aᵢ−bᵢ)π/2).
    pub fn quantum_distance(&mut self, a: &[f64], b: &[f64]) -> QlabResult<f64> {
        self.simulator.reset();
        let n = self.num_qubits();
        for (q, (x, y)) in a.iter().zip(b).take(n).enumerate() {
            self.simulator.apply(&Gate::ry(x * PI), &[q])?;
            self.simulator.apply(&Gate::ry(-y * PI), &[q])?;
        }
        Ok(1.0 - self.simulator.probabilities()[0])
    }

    fn nearest_centroid(&mut self, features: &[f64], centroids: &[Vec<f64>]) -> QlabResult<usize> {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = self.quantum_distance(features, centroid)?;
            if d < best_distance {
                best_distance = d;
                best = c;
            }
        }
        Ok(best)
    }

    /// Mean of each cluster; an empty cluster takes a random data point
    fn update_centroids(
        &mut self,
        data: &[DataPoint],
        clusters: &[usize],
        k: usize,
    ) -> Vec<Vec<f64>> {
        let mut sums = vec![vec![0.0; self.num_features]; k];
        let mut counts = vec![0usize; k];
        for (point, &c) in data.iter().zip(clusters) {
            counts[c] += 1;
            for (s, x) in sums[c].iter_mut().zip(&point.features) {
                *s += x;
            }
        }

        sums.into_iter()
            .zip(counts)
            .map(|(sum, count)| {
                if count == 0 {
                    let i = self.simulator.rng_mut().gen_range(0..data.len());
                    data[i].features.clone()
                } else {
                    sum.into_iter().map(|s| s / count as f64).collect()
                }
            })
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_data(&self, data: &[DataPoint]) -> QlabResult<()> {
        if data.is_empty() {
            return Err(QlabError::InvalidInput("data set is empty".to_string()));
        }
        if let Some((i, p)) = data
            .iter()
            .enumerate()
            .find(|(_, p)| p.features.len() != self.num_features)
        {
            return Err(QlabError::InvalidInput(format!(
                "point {} has {} features, expected {}",
                i,
                p.features.len(),
                self.num_features
            )));
        }
        Ok(())
    }

    fn check_parameters(&self, parameters: &[f64]) -> QlabResult<()> {
        if parameters.len() != self.num_parameters() {
            return Err(QlabError::InvalidInput(format!(
                "got {} parameters, this register needs {}",
                parameters.len(),
                self.num_parameters()
            )));
        }
        Ok(())
    }

    /// Snapshot of the engine
    pub fn quantum_state(&self) -> QuantumState {
        self.simulator.state()
    }

    /// Active configuration
    pub fn config(&self) -> &QmlConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
