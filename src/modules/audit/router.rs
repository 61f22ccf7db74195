use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::list_audit_entries;

pub fn init_audit_router() -> Router<AppState> {
    Router::new().route("/audit", get(list_audit_entries))
}
