//! End-to-end tests of the gRPC service over an in-memory SQLite store.
//!
//! Requests go straight to `AuthGrpcService` without a network listener.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use futures::future::join_all;
use tonic::{Code, Request};

use common::{AppError, DatabaseConfig, INTERNAL_ERROR_MESSAGE};
use domain::App;
use proto::auth::{auth_server::Auth, IsAdminRequest, LoginRequest, RegisterRequest};
use sso_lib::build_service;
use sso_lib::config::SsoConfig;
use sso_lib::grpc::AuthGrpcService;
use sso_lib::infra::Database;
use sso_lib::repository::{AppRepository, AppStore, UserStore};
use sso_lib::token::{Clock, ManualClock, TokenIssuer};

const EMAIL: &str = "a@b.co-example.com";
const PASSWORD: &str = "longenoughpassword";
const APP_SECRET: &str = "integration-test-app-secret";

struct TestContext {
    gateway: AuthGrpcService,
    users: UserStore,
    clock: Arc<ManualClock>,
    app: App,
}

async fn setup_with_ttl(token_ttl: Duration) -> TestContext {
    let mut config = SsoConfig {
        token_ttl,
        ..SsoConfig::default()
    };
    // A single connection keeps every query on the same in-memory database
    config.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        statement_timeout_ms: 10_000,
    };

    let db = Database::connect(&config.database).await.unwrap();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));

    let apps = AppStore::new(db.get_connection());
    let app_id = apps
        .create("test-app".to_string(), APP_SECRET.to_string())
        .await
        .unwrap();
    let app = apps.find_by_id(app_id).await.unwrap().unwrap();

    TestContext {
        gateway: build_service(db.get_connection(), &config, clock.clone()),
        users: UserStore::new(db.get_connection()),
        clock,
        app,
    }
}

async fn setup() -> TestContext {
    setup_with_ttl(Duration::hours(1)).await
}

fn register_request(email: &str, password: &str) -> Request<RegisterRequest> {
    Request::new(RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

fn login_request(email: &str, password: &str, app_id: i32) -> Request<LoginRequest> {
    Request::new(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        app_id,
    })
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let ctx = setup().await;

    let user_id = ctx
        .gateway
        .register(register_request(EMAIL, PASSWORD))
        .await
        .unwrap()
        .into_inner()
        .user_id;
    assert!(user_id > 0);

    let token = ctx
        .gateway
        .login(login_request(EMAIL, PASSWORD, ctx.app.id))
        .await
        .unwrap()
        .into_inner()
        .token;

    let claims = TokenIssuer::new(ctx.clock.clone())
        .verify(&token, &ctx.app)
        .unwrap();
    assert_eq!(claims.uid, user_id);
    assert_eq!(claims.email, EMAIL);
    assert_eq!(claims.app_id, ctx.app.id);
    assert_eq!(claims.iat, ctx.clock.now().timestamp());
}

#[tokio::test]
async fn test_duplicate_registration_keeps_one_row() {
    let ctx = setup().await;

    let first = ctx.gateway.register(register_request(EMAIL, PASSWORD)).await;
    assert!(first.is_ok());

    let status = ctx
        .gateway
        .register(register_request(EMAIL, "anotherlongpassword"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);
    assert_eq!(status.message(), INTERNAL_ERROR_MESSAGE);

    assert_eq!(ctx.users.count_by_email(EMAIL).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = setup().await;
    ctx.gateway
        .register(register_request(EMAIL, PASSWORD))
        .await
        .unwrap();

    let attempts = [
        login_request(EMAIL, "wrongpassword123", ctx.app.id),
        login_request("nobody@example.com", PASSWORD, ctx.app.id),
        login_request(EMAIL, PASSWORD, ctx.app.id + 100),
    ];

    for request in attempts {
        let status = ctx.gateway.login(request).await.unwrap_err();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), INTERNAL_ERROR_MESSAGE);
    }
}

#[tokio::test]
async fn test_is_admin_reflects_external_flag() {
    let ctx = setup().await;
    let user_id = ctx
        .gateway
        .register(register_request(EMAIL, PASSWORD))
        .await
        .unwrap()
        .into_inner()
        .user_id;

    let is_admin = ctx
        .gateway
        .is_admin(Request::new(IsAdminRequest { user_id }))
        .await
        .unwrap()
        .into_inner()
        .is_admin;
    assert!(!is_admin);

    ctx.users.set_admin(user_id, true).await.unwrap();

    let is_admin = ctx
        .gateway
        .is_admin(Request::new(IsAdminRequest { user_id }))
        .await
        .unwrap()
        .into_inner()
        .is_admin;
    assert!(is_admin);
}

#[tokio::test]
async fn test_is_admin_unknown_user_is_internal() {
    let ctx = setup().await;

    let status = ctx
        .gateway
        .is_admin(Request::new(IsAdminRequest { user_id: 9999 }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
}

#[tokio::test]
async fn test_set_admin_unknown_user() {
    let ctx = setup().await;
    let result = ctx.users.set_admin(9999, true).await;
    assert!(matches!(result, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn test_token_expires_with_injected_clock() {
    let ctx = setup_with_ttl(Duration::seconds(1)).await;
    ctx.gateway
        .register(register_request(EMAIL, PASSWORD))
        .await
        .unwrap();

    let token = ctx
        .gateway
        .login(login_request(EMAIL, PASSWORD, ctx.app.id))
        .await
        .unwrap()
        .into_inner()
        .token;

    let issuer = TokenIssuer::new(ctx.clock.clone());
    assert!(issuer.verify(&token, &ctx.app).is_ok());

    ctx.clock.advance(Duration::seconds(2));
    assert!(matches!(
        issuer.verify(&token, &ctx.app),
        Err(AppError::TokenExpired)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_registrations() {
    let ctx = setup().await;

    let handles = (0..6).map(|i| {
        let gateway = ctx.gateway.clone();
        tokio::spawn(async move {
            gateway
                .register(register_request(&format!("user{}@example.com", i), PASSWORD))
                .await
                .map(|response| response.into_inner().user_id)
        })
    });

    let mut ids: Vec<i64> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_email_registers_once() {
    let ctx = setup().await;

    let handles = (0..5).map(|_| {
        let gateway = ctx.gateway.clone();
        tokio::spawn(async move { gateway.register(register_request(EMAIL, PASSWORD)).await })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for status in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(status.code(), Code::Internal);
    }

    assert_eq!(ctx.users.count_by_email(EMAIL).await.unwrap(), 1);
}
