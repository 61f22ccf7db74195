//! Role-based authorization middleware for Axum
//!
//! Two ways to gate a route on the caller's role:
//! 1. Layer-based middleware via [`require_roles`] (and the [`require_admin`] shorthand)
//! 2. Extractor-based via [`RequireAdmin`]
//!
//! Both authenticate first, so an unauthenticated caller gets 401 and an
//! authenticated caller with the wrong role gets 403.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use conclave_auth::AuthError;
use conclave_core::AppError;
use conclave_models::{Role, Session};
use conclave_observability::track_authorization_check;

use crate::middleware::auth::authenticate;
use crate::state::AppState;

/// Checks the session's role snapshot against `allowed_roles`.
pub fn check_role(session: &Session, allowed_roles: &[Role]) -> Result<(), AuthError> {
    let allowed = allowed_roles.contains(&session.role);
    track_authorization_check(allowed, session.role.as_str());

    if allowed {
        Ok(())
    } else {
        Err(AuthError::Forbidden(
            "Access denied. Insufficient role for this resource".to_string(),
        ))
    }
}

/// Middleware function that checks the authenticated session holds one of the required roles.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use conclave::middleware::role::require_roles;
/// use conclave_models::Role;
///
/// let finance_routes = Router::new()
///     .route("/funding", get(list_prospects))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, &[Role::Admin, Role::Board])
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let session = authenticate(&mut parts, &state)
        .await
        .map_err(AuthError::into_app_error)?;

    check_role(&session, allowed_roles).map_err(AuthError::into_app_error)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routes.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use conclave::middleware::role::require_admin;
///
/// let admin_routes = Router::new()
///     .route("/audit", get(list_audit_entries))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Admin and board routes.
pub async fn require_board(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin, Role::Board]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor for admin-only handlers
///
/// # Example
///
/// ```rust,ignore
/// use conclave::middleware::role::RequireAdmin;
///
/// pub async fn revoke_handler(RequireAdmin(session): RequireAdmin) -> Result<Json<Response>, AppError> {
///     // Only admins get here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Session);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = authenticate(parts, state)
            .await
            .map_err(AuthError::into_app_error)?;

        check_role(&session, &[Role::Admin]).map_err(AuthError::into_app_error)?;

        Ok(RequireAdmin(session))
    }
}
