//! Feature vector contract for the risk scorer
//!
//! The scorer consumes exactly eleven ground measurements in a fixed order.
//! The order is the scorer's input contract: reordering it silently changes
//! what the trained coefficients mean.

use std::collections::HashMap;

use ndarray::Array1;

use crate::error::ValidationError;

/// Measurement field names, in scorer input order.
pub const FEATURE_FIELDS: [&str; 11] = [
    "TerrainType",
    "Weather",
    "RockDensity",
    "SurfaceRoughness",
    "MoisturePct",
    "SlopeDeg",
    "TrafficLoad",
    "DrainageQuality",
    "DepthCm",
    "SoilHardness",
    "VibrationLevel",
];

/// A single assessment row: eleven real numbers in `FEATURE_FIELDS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Array1<f64>);

impl FeatureVector {
    /// Number of measurements per assessment.
    pub const DIM: usize = FEATURE_FIELDS.len();

    /// Parse a raw field-name → string map into a feature vector.
    ///
    /// Fails on the first missing or non-numeric field, naming it. No
    /// partial vector is ever produced.
    pub fn from_raw(raw: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut values = Vec::with_capacity(Self::DIM);
        for field in FEATURE_FIELDS {
            let text = raw
                .get(field)
                .ok_or(ValidationError::MissingField { field })?;
            let value: f64 = text.trim().parse().map_err(|_| ValidationError::NotNumeric {
                field,
                value: text.clone(),
            })?;
            values.push(value);
        }
        Ok(Self(Array1::from(values)))
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
