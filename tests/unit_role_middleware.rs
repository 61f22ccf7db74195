mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Router, middleware};
use chrono::{Duration, Utc};
use common::{bearer_request, test_state, unreachable_pool};
use conclave::middleware::auth::{AuthSession, require_auth};
use conclave::middleware::role::{RequireAdmin, require_admin, require_board};
use conclave::state::AppState;
use conclave_models::{Role, Session};
use tower::ServiceExt;

/// State whose store is unreachable; only sessions primed into the cache verify.
fn cached_state(sessions: &[(&str, Role)]) -> AppState {
    let state = test_state(unreachable_pool());
    let now = Utc::now();

    for (token, role) in sessions {
        state.sessions.cache().put(Session {
            token: token.to_string(),
            email: format!("{role}@org.example"),
            role: *role,
            created_at: now,
            expires_at: now + Duration::days(30),
            last_activity_at: now,
            ip_address: None,
            user_agent: None,
        });
    }

    state
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/admin-only", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .merge(
            Router::new()
                .route("/board", get(|| async { "ok" }))
                .route_layer(middleware::from_fn_with_state(state.clone(), require_board)),
        )
        .merge(
            Router::new()
                .route(
                    "/whoami",
                    get(|AuthSession(session): AuthSession| async move { session.email }),
                )
                .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
        )
        .merge(Router::new().route(
            "/extract-admin",
            get(|RequireAdmin(session): RequireAdmin| async move { session.email }),
        ))
        .with_state(state)
}

fn standard_app() -> Router {
    app(cached_state(&[
        ("admin-token", Role::Admin),
        ("board-token", Role::Board),
        ("advisory-token", Role::Advisory),
    ]))
}

async fn status(app: &Router, uri: &str, token: Option<&str>) -> StatusCode {
    let request = match token {
        Some(token) => bearer_request("GET", uri, token),
        None => Request::builder().uri(uri).body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_require_admin_rejects_board() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/admin-only", Some("board-token")).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_admin_accepts_admin() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/admin-only", Some("admin-token")).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_require_admin_without_token_is_unauthorized() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/admin-only", None).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_unknown_token_fails_closed() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/admin-only", Some("not-a-session")).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status(&app, "/whoami", Some("not-a-session")).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_require_board_allows_admin_and_board() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/board", Some("admin-token")).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, "/board", Some("board-token")).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, "/board", Some("advisory-token")).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_auth_attaches_session() {
    let app = standard_app();
    let response = app
        .oneshot(bearer_request("GET", "/whoami", "advisory-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&body[..], b"advisory@org.example");
}

#[tokio::test]
async fn test_require_admin_extractor() {
    let app = standard_app();
    assert_eq!(
        status(&app, "/extract-admin", Some("admin-token")).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, "/extract-admin", Some("board-token")).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status(&app, "/extract-admin", None).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_expired_cached_session_is_rejected() {
    let state = test_state(unreachable_pool());
    let now = Utc::now();
    state.sessions.cache().put(Session {
        token: "expired-token".to_string(),
        email: "admin@org.example".to_string(),
        role: Role::Admin,
        created_at: now - Duration::days(31),
        expires_at: now - Duration::seconds(1),
        last_activity_at: now - Duration::days(31),
        ip_address: None,
        user_agent: None,
    });

    let app = app(state);
    assert_eq!(
        status(&app, "/admin-only", Some("expired-token")).await,
        StatusCode::UNAUTHORIZED
    );
}
