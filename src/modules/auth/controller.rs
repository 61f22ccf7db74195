use axum::Json;
use axum::extract::State;
use tracing::instrument;
use utoipa::ToSchema;

use conclave_auth::AuthError;
use conclave_core::AppError;
use conclave_models::{LoginRequest, LoginResponse, MeResponse, MessageResponse, SessionResponse};

use crate::middleware::auth::AuthSession;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::provenance::ClientProvenance;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login with an allowlisted email and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 400, description = "Bad request - email missing or malformed", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Session could not be stored", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ClientProvenance(provenance): ClientProvenance,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state
        .sessions
        .login(&dto.email, provenance)
        .await
        .map_err(AuthError::into_app_error)?;

    Ok(Json(LoginResponse::from(&session)))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Invalid or expired session", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .sessions
        .destroy(auth.token())
        .await
        .map_err(AuthError::into_app_error)?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Inspect the session addressed by the bearer token
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session is valid", body = SessionResponse),
        (status = 401, description = "Invalid or expired session", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn get_session(AuthSession(session): AuthSession) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}

/// Get the authenticated caller
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Authenticated caller", body = MeResponse),
        (status = 401, description = "Invalid or expired session", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn get_me(AuthSession(session): AuthSession) -> Json<MeResponse> {
    Json(MeResponse::from(&session))
}
