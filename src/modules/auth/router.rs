use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::{get_me, get_session, login, logout};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/login", post(login))
        .route("/session", get(get_session))
        .merge(protected)
}
