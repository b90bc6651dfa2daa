//! REST API for the session-gated assessment workflow
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/register` - Register a new user
//! - `POST /api/session` - Create a new session
//! - `GET /api/session/:id` - Session info
//! - `POST /api/session/:id/login` - Authenticate the session
//! - `POST /api/session/:id/logout` - Reset the session to Anonymous
//! - `POST /api/session/:id/change-password` - Change the bound user's password
//! - `POST /api/session/:id/region` - Select state and city
//! - `POST /api/session/:id/assess` - Submit the eleven measurements
//! - `POST /api/session/:id/chat` - Advisory chatbot reply
//!
//! Session-scoped POST routes create the session implicitly on first
//! interaction; only the read-only info route reports an unknown id.

pub mod assess_routes;
pub mod auth_routes;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use crate::assessment::{AssessmentResult, AssessmentWorkflow};
use crate::directory::UserDirectory;
use crate::error::{DirectoryError, PitfallError, SessionError};
use crate::session::{Region, Session, SessionStore, Stage};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub sessions: SessionStore,
    pub workflow: Arc<AssessmentWorkflow>,
}

/// Uniform response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn status_for(error: &PitfallError) -> StatusCode {
    match error {
        PitfallError::Directory(DirectoryError::DuplicateIdentifier(_)) => StatusCode::CONFLICT,
        PitfallError::Directory(DirectoryError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
        PitfallError::Directory(DirectoryError::WrongOldSecret) => StatusCode::UNAUTHORIZED,
        PitfallError::Directory(DirectoryError::ConfirmationMismatch) => StatusCode::BAD_REQUEST,
        PitfallError::Session(SessionError::PreconditionNotMet { .. }) => StatusCode::FORBIDDEN,
        PitfallError::Session(SessionError::RegionIncomplete) => StatusCode::UNPROCESSABLE_ENTITY,
        PitfallError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PitfallError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PitfallError::SessionNotFound(_) => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for PitfallError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Request failed: {}", self);
        }
        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/register", post(auth_routes::register))
        .route("/api/session", post(create_session))
        .route("/api/session/:id", get(session_info))
        .route("/api/session/:id/login", post(auth_routes::login))
        .route("/api/session/:id/logout", post(auth_routes::logout))
        .route(
            "/api/session/:id/change-password",
            post(auth_routes::change_password),
        )
        .route("/api/session/:id/region", post(assess_routes::select_region))
        .route("/api/session/:id/assess", post(assess_routes::assess))
        .route("/api/session/:id/chat", post(assess_routes::chat))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok("OK".to_string()))
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub stage: Stage,
    pub user: Option<String>,
    pub region: Option<Region>,
    pub last_result: Option<AssessmentResult>,
}

// Create a new session, initially Anonymous
async fn create_session(State(state): State<AppState>) -> Json<ApiResponse<SessionCreated>> {
    let id = Uuid::new_v4();
    let mut sessions = state.sessions.write().await;
    sessions.insert(id, Session::new());
    Json(ApiResponse::ok(SessionCreated { id }))
}

// Current stage and bindings of a session
async fn session_info(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionInfo>>, PitfallError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(PitfallError::SessionNotFound(id))?;
    Ok(Json(ApiResponse::ok(SessionInfo {
        id,
        stage: session.stage(),
        user: session.user().map(str::to_string),
        region: session.region().cloned(),
        last_result: session.last_result().cloned(),
    })))
}
