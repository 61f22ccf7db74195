use std::sync::Arc;

use conclave_auth::{SessionService, StaticRoleProvider};
use conclave_config::{CorsConfig, RoleConfig, SessionConfig};
use conclave_db::{PgPool, init_db_pool};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub sessions: SessionService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        db: PgPool,
        role_config: RoleConfig,
        session_config: SessionConfig,
        cors_config: CorsConfig,
    ) -> Self {
        let roles = Arc::new(StaticRoleProvider::from(role_config));
        let sessions = SessionService::new(db.clone(), roles, session_config);

        Self {
            db,
            sessions,
            cors_config,
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = init_db_pool().await?;

    Ok(AppState::new(
        db,
        RoleConfig::from_env(),
        SessionConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
