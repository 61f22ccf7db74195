use axum::{
    RequestPartsExt as _,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use conclave_auth::AuthError;
use conclave_core::AppError;
use conclave_models::Session;

use crate::state::AppState;

/// Extractor that resolves the bearer token to a live session.
///
/// A session already attached by [`require_auth`] is reused; otherwise the
/// token is verified here. Missing token and invalid token both reject with 401.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl AuthSession {
    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn token(&self) -> &str {
        &self.0.token
    }
}

/// Reads the `Authorization: Bearer <token>` header.
///
/// An absent header is [`AuthError::MissingToken`]; a header that is present
/// but unusable is [`AuthError::Unauthenticated`].
pub async fn bearer_token(parts: &mut Parts) -> Result<String, AuthError> {
    match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => {
            let token = bearer.token().trim();
            if token.is_empty() {
                Err(AuthError::Unauthenticated)
            } else {
                Ok(token.to_string())
            }
        }
        Err(e) if e.is_missing() => Err(AuthError::MissingToken),
        Err(_) => Err(AuthError::Unauthenticated),
    }
}

pub async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<Session, AuthError> {
    if let Some(session) = parts.extensions.get::<Session>() {
        return Ok(session.clone());
    }

    let token = bearer_token(parts).await?;
    let session = state
        .sessions
        .verify(&token)
        .await
        .ok_or(AuthError::Unauthenticated)?;

    parts.extensions.insert(session.clone());

    Ok(session)
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
            .await
            .map(AuthSession)
            .map_err(AuthError::into_app_error)
    }
}

/// Middleware that rejects unauthenticated requests with 401 and attaches the
/// verified [`Session`] to the request extensions.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::get};
/// use conclave::middleware::auth::require_auth;
///
/// let protected = Router::new()
///     .route("/committees", get(list_committees))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    authenticate(&mut parts, &state)
        .await
        .map_err(AuthError::into_app_error)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
