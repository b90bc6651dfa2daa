//! Registration, login, logout and password-change endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{PitfallError, SessionError};
use crate::session::{Session, Stage};

use super::{ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// Register a new user; does not touch any session
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<String>>, PitfallError> {
    state.directory.register(&req.username, &req.password).await?;
    Ok(Json(ApiResponse::ok(
        "Registration successful! Please login.".to_string(),
    )))
}

// Authenticate and bind the user to the session. Sessions are created
// implicitly on first interaction, so an unseen id starts Anonymous here.
pub async fn login(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<String>>, PitfallError> {
    let user = state
        .directory
        .authenticate(&req.username, &req.password)
        .await?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(id).or_insert_with(Session::new);
    session.bind_user(user.identifier);
    info!("User '{}' logged in to session {}", req.username, id);
    Ok(Json(ApiResponse::ok("Login successful".to_string())))
}

// Full reset back to Anonymous
pub async fn logout(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, PitfallError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(id).or_insert_with(Session::new);
    session.logout();
    Ok(Json(ApiResponse::ok("Logged out successfully.".to_string())))
}

// Change the bound user's password, proving the current one
pub async fn change_password(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<String>>, PitfallError> {
    let username = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.entry(id).or_insert_with(Session::new);
        match session.user() {
            Some(user) => user.to_string(),
            None => {
                return Err(SessionError::PreconditionNotMet {
                    required: Stage::Authenticated,
                }
                .into())
            }
        }
    };

    state
        .directory
        .change_secret(
            &username,
            &req.old_password,
            &req.new_password,
            &req.confirm_password,
        )
        .await?;
    Ok(Json(ApiResponse::ok(
        "Password changed successfully.".to_string(),
    )))
}
