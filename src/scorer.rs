//! Risk scorer strategies
//!
//! The assessment workflow sees one capability: map a feature vector to a
//! probability of pitfall in [0, 1]. Which implementation provides it is
//! decided once at process start: a logistic model loaded from a JSON
//! weights artifact when one is present, a built-in stub otherwise. The
//! assessment path itself never branches on scorer kind.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ScoringError;
use crate::features::FeatureVector;

/// Probability-of-pitfall scorer.
///
/// Deterministic for a fixed underlying model, read-only with respect to
/// shared state, so invocations may run freely in parallel.
pub trait RiskScorer: Send + Sync {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError>;
}

/// Persisted logistic weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Logistic model: dot product plus intercept through a sigmoid.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticScorer {
    /// Build from raw weights. The coefficient count must match the
    /// feature dimension; a mismatched artifact is rejected here rather
    /// than at scoring time.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ScoringError> {
        if coefficients.len() != FeatureVector::DIM {
            return Err(ScoringError::DimensionMismatch {
                expected: FeatureVector::DIM,
                got: coefficients.len(),
            });
        }
        Ok(Self {
            coefficients: Array1::from(coefficients),
            intercept,
        })
    }

    /// Load weights from a JSON artifact file.
    pub fn from_artifact_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading model artifact {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&text)
            .with_context(|| format!("parsing model artifact {}", path.display()))?;
        Ok(Self::new(artifact.coefficients, artifact.intercept)?)
    }
}

/// Numerically stable sigmoid, split on the sign of the argument.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

impl RiskScorer for LogisticScorer {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let x = features.as_array();
        if x.len() != self.coefficients.len() {
            return Err(ScoringError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.len(),
            });
        }
        Ok(sigmoid(x.dot(&self.coefficients) + self.intercept))
    }
}

/// Fallback scorer with fixed built-in weights, used when no trained
/// artifact is available. Same contract, clearly not a trained model.
#[derive(Debug, Clone)]
pub struct StubScorer {
    inner: LogisticScorer,
}

const STUB_COEFFICIENTS: [f64; 11] = [
    0.04,  // TerrainType
    0.02,  // Weather
    -0.03, // RockDensity
    0.05,  // SurfaceRoughness
    0.06,  // MoisturePct
    0.09,  // SlopeDeg
    0.03,  // TrafficLoad
    -0.07, // DrainageQuality
    0.01,  // DepthCm
    -0.05, // SoilHardness
    0.08,  // VibrationLevel
];
const STUB_INTERCEPT: f64 = -1.2;

impl StubScorer {
    pub fn new() -> Self {
        Self {
            inner: LogisticScorer {
                coefficients: Array1::from(STUB_COEFFICIENTS.to_vec()),
                intercept: STUB_INTERCEPT,
            },
        }
    }
}

impl Default for StubScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer for StubScorer {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        self.inner.score(features)
    }
}

/// Select the process scorer from artifact availability.
///
/// A present-but-malformed artifact is a startup error, not a silent
/// fallback.
pub fn load_scorer(path: &Path) -> anyhow::Result<Arc<dyn RiskScorer>> {
    if path.exists() {
        let scorer = LogisticScorer::from_artifact_file(path)?;
        info!("Loaded trained pitfall model from {}", path.display());
        Ok(Arc::new(scorer))
    } else {
        warn!(
            "Model artifact {} not found, using built-in stub scorer",
            path.display()
        );
        Ok(Arc::new(StubScorer::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use crate::features::FEATURE_FIELDS;

    fn features_of(value: f64) -> FeatureVector {
        let raw: HashMap<String, String> = FEATURE_FIELDS
            .iter()
            .map(|field| (field.to_string(), value.to_string()))
            .collect();
        FeatureVector::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let err = LogisticScorer::new(vec![0.1; 10], 0.0).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::DimensionMismatch {
                expected: 11,
                got: 10
            }
        ));
    }

    #[test]
    fn test_score_is_a_probability_and_deterministic() {
        let scorer = StubScorer::new();
        let features = features_of(3.0);

        let first = scorer.score(&features).unwrap();
        let second = scorer.score(&features).unwrap();
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn test_zero_vector_scores_sigmoid_of_intercept() {
        let scorer = LogisticScorer::new(vec![0.5; 11], 0.0).unwrap();
        let p = scorer.score(&features_of(0.0)).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!((sigmoid(1000.0) - 1.0).abs() < 1e-9);
        assert!(sigmoid(-1000.0) < 1e-9);
    }

    #[test]
    fn test_load_scorer_falls_back_when_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_model.json");
        let scorer = load_scorer(&path).unwrap();
        // Stub weights at the zero vector: sigmoid(-1.2) < 0.5.
        let p = scorer.score(&features_of(0.0)).unwrap();
        assert!(p < 0.5);
    }

    #[test]
    fn test_load_scorer_reads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitfall_model.json");
        let artifact = ModelArtifact {
            coefficients: vec![0.0; 11],
            intercept: 2.0,
        };
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", serde_json::to_string(&artifact).unwrap()).unwrap();

        let scorer = load_scorer(&path).unwrap();
        let p = scorer.score(&features_of(7.0)).unwrap();
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_load_scorer_rejects_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitfall_model.json");
        std::fs::write(&path, "{\"coefficients\": [1.0, 2.0], \"intercept\": 0.0}").unwrap();
        assert!(load_scorer(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(load_scorer(&path).is_err());
    }
}
