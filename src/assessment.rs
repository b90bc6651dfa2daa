//! Assessment workflow and risk classification
//!
//! `assess` is the only path to a result: precondition check, parse the
//! eleven measurements, score, classify, record in the session. Any
//! failure surfaces before the session is touched, so a failed submission
//! never disturbs the previously stored result.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PitfallError;
use crate::features::FeatureVector;
use crate::scorer::RiskScorer;
use crate::session::{Session, Stage};

/// Label cut points. Probabilities at a boundary belong to the tier above
/// it: 0.30 is Moderate, 0.70 is High.
pub const LOW_RISK_CEILING: f64 = 0.30;
pub const HIGH_RISK_FLOOR: f64 = 0.70;

/// Binary-class cut point. Deliberately independent of the label cut
/// points: pass/fail and risk tier are two separate policies.
pub const POSITIVE_CLASS_THRESHOLD: f64 = 0.50;

/// Discretized risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Pitfall Risk",
            RiskLabel::Moderate => "Moderate Pitfall Risk",
            RiskLabel::High => "High Pitfall Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one assessment submission. Recomputed on every submission,
/// never persisted beyond the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Probability of the pitfall class, in [0, 1].
    pub probability: f64,
    /// 1 if `probability >= 0.50`, else 0.
    pub class: u8,
    pub label: RiskLabel,
}

/// Pure classification of a scorer probability.
pub fn classify(probability: f64) -> AssessmentResult {
    let label = if probability < LOW_RISK_CEILING {
        RiskLabel::Low
    } else if probability < HIGH_RISK_FLOOR {
        RiskLabel::Moderate
    } else {
        RiskLabel::High
    };
    let class = u8::from(probability >= POSITIVE_CLASS_THRESHOLD);
    AssessmentResult {
        probability,
        class,
        label,
    }
}

/// Orchestrates one assessment submission against a session.
pub struct AssessmentWorkflow {
    scorer: Arc<dyn RiskScorer>,
}

impl AssessmentWorkflow {
    pub fn new(scorer: Arc<dyn RiskScorer>) -> Self {
        Self { scorer }
    }

    /// Run one assessment.
    ///
    /// The session must have reached LocationSelected. On success the
    /// result is recorded in the session (overwriting any prior result)
    /// and returned; on any failure the session is left untouched.
    pub fn assess(
        &self,
        session: &mut Session,
        raw: &HashMap<String, String>,
    ) -> Result<AssessmentResult, PitfallError> {
        session.require(Stage::LocationSelected)?;

        let features = FeatureVector::from_raw(raw)?;
        let probability = self.scorer.score(&features)?;
        let result = classify(probability);
        debug!(
            "Assessment scored probability {:.4}: class {}, {}",
            probability, result.class, result.label
        );

        session.record_result(result.clone());
        Ok(result)
    }
}
