#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use ticketdesk_api::auth::jwt::JwtConfig;
use ticketdesk_api::auth::password::hash_password;
use ticketdesk_api::config::ServerConfig;
use ticketdesk_api::router::build_app_router;
use ticketdesk_api::state::AppState;
use ticketdesk_db::models::admin::{Admin, CreateAdmin};
use ticketdesk_db::repositories::{AdminRepo, RoleRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";
pub const TEST_SECRET: &str = "integration-test-secret-long-enough";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig::with_secret(TEST_SECRET),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, Arc::new(test_config()))
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool))
}

/// Insert an admin with [`TEST_PASSWORD`] and the given seeded role.
pub async fn create_admin(pool: &PgPool, username: &str, role: &str) -> Admin {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .expect("role lookup should succeed")
        .expect("role should be seeded");
    let input = CreateAdmin {
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        email: format!("{username}@tickets.test"),
        full_name: format!("{username} admin"),
        role_id: role.id,
    };
    AdminRepo::create(pool, &input)
        .await
        .expect("admin creation should succeed")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a GraphQL document to `/graphql`, optionally with a bearer token.
pub async fn graphql(
    app: Router,
    query: &str,
    variables: Value,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .header("user-agent", "integration-test")
        .header("x-forwarded-for", "203.0.113.10");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = json!({ "query": query, "variables": variables });
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

pub const LOGIN: &str = r#"
    mutation Login($username: String!, $password: String!) {
        adminLogin(username: $username, password: $password) {
            success
            message
            token
            expiresAt
            requiresTwoFactor
            challengeToken
            admin { id username email fullName isActive twoFactorEnabled lastLoginAt role { name permissions } }
        }
    }
"#;

pub const VALIDATE: &str = r#"
    query Validate($token: String!) {
        adminValidateSession(token: $token) {
            valid
            message
            expiresAt
            admin { username role { name } }
        }
    }
"#;

/// Log in through the API and return the `adminLogin` payload.
pub async fn login(pool: &PgPool, username: &str, password: &str) -> Value {
    let app = build_test_app(pool.clone());
    let (status, json) = graphql(
        app,
        LOGIN,
        json!({ "username": username, "password": password }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.get("errors").is_none(), "unexpected errors: {json}");
    json["data"]["adminLogin"].clone()
}

/// Log in and return the session token, asserting success.
pub async fn login_token(pool: &PgPool, username: &str) -> String {
    let payload = login(pool, username, TEST_PASSWORD).await;
    assert_eq!(payload["success"], true, "login should succeed: {payload}");
    payload["token"].as_str().unwrap().to_string()
}
