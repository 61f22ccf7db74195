use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use conclave_models::{
    AuditEntry, AuditQuery, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    PermissionSet, Role, SessionResponse,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::get_session,
        crate::modules::auth::controller::get_me,
        crate::modules::audit::controller::list_audit_entries,
    ),
    components(
        schemas(
            Role,
            PermissionSet,
            LoginRequest,
            LoginResponse,
            SessionResponse,
            MeResponse,
            MessageResponse,
            AuditEntry,
            AuditQuery,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Admin portal sessions"),
        (name = "Audit", description = "Login and logout trail")
    ),
    info(
        title = "Conclave API",
        version = "0.1.0",
        description = "Session and role-based authorization for the conference administration portal.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .build(),
                ),
            )
        }
    }
}
