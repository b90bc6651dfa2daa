//! Region selection, assessment submission and chatbot endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::AssessmentResult;
use crate::chatbot;
use crate::error::PitfallError;
use crate::session::{Session, Stage};

use super::{ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct RegionRequest {
    pub state: String,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub prediction: u8,
    /// Probability of pitfall as a percentage, rounded to two decimals.
    pub probability: f64,
    pub risk_label: String,
}

impl From<AssessmentResult> for AssessResponse {
    fn from(result: AssessmentResult) -> Self {
        Self {
            prediction: result.class,
            probability: (result.probability * 10000.0).round() / 100.0,
            risk_label: result.label.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// Select or re-select the session's region
pub async fn select_region(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<RegionRequest>,
) -> Result<Json<ApiResponse<String>>, PitfallError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(id).or_insert_with(Session::new);
    session.select_region(&req.state, &req.city)?;
    Ok(Json(ApiResponse::ok(format!(
        "State: {}, City: {} selected successfully!",
        req.state, req.city
    ))))
}

// Submit the eleven measurements for scoring
pub async fn assess(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(raw): Json<HashMap<String, String>>,
) -> Result<Json<ApiResponse<AssessResponse>>, PitfallError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(id).or_insert_with(Session::new);
    let result = state.workflow.assess(session, &raw)?;
    Ok(Json(ApiResponse::ok(result.into())))
}

// Advisory chatbot reply; gated behind authentication like every
// post-login page in the workflow
pub async fn chat(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, PitfallError> {
    {
        let mut sessions = state.sessions.write().await;
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.require(Stage::Authenticated)?;
    }
    Ok(Json(ApiResponse::ok(ChatResponse {
        reply: chatbot::reply(&req.message).to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::classify;

    #[test]
    fn test_assess_response_reports_percent() {
        let response = AssessResponse::from(classify(0.8234567));
        assert_eq!(response.probability, 82.35);
        assert_eq!(response.prediction, 1);
        assert_eq!(response.risk_label, "High Pitfall Risk");
    }
}
