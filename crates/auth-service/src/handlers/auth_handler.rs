use crate::config::Config;
use crate::errors::AuthError;
use crate::models::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use crate::repositories::accounts::AccountStore;
use crate::services::{login_service, signup_service};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub config: Config,
}

/// Handle a login request
///
/// POST /api/login
///
/// A body that fails to parse surfaces as a structured 400, not a transport
/// error.
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::MalformedRequest(e.to_string()))?;

    let response = login_service::authenticate(
        state.store.as_ref(),
        &state.config,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(response))
}

/// Handle a signup request
///
/// POST /api/signup
pub async fn handle_signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| AuthError::MalformedRequest(e.to_string()))?;

    let response = signup_service::register(state.store.as_ref(), &state.config, payload).await?;

    Ok(Json(response))
}
