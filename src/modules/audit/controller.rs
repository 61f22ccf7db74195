use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;
use validator::Validate;

use conclave_core::AppError;
use conclave_models::{AuditEntry, AuditQuery};

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// List the most recent login and logout events
#[utoipa::path(
    get,
    path = "/admin/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Newest audit entries first", body = Vec<AuditEntry>),
        (status = 400, description = "Limit out of range", body = ErrorResponse),
        (status = 401, description = "Invalid or expired session", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn list_audit_entries(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    query.validate().map_err(AppError::bad_request)?;

    let entries = state.sessions.audit().recent(query.limit()).await?;

    Ok(Json(entries))
}
