#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::Value;

use common::*;

#[actix_web::test]
async fn banner_names_the_service() {
    let state = Mocks::default().state();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["health"], "/api/health");
}

#[actix_web::test]
async fn health_reports_dependencies() {
    let mut mocks = Mocks::default();
    mocks.users.expect_check_connection().times(1).returning(|| Ok(()));
    let state = mocks.state();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"], "OK");
    assert_eq!(body["data"]["redis"], "Not configured");
    assert!(body["data"]["uptime"].is_string());
}

#[actix_web::test]
async fn health_is_served_from_cache_between_checks() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_check_connection()
        .times(1)
        .returning(|| Err(portfolio_api::errors::AppError::InternalError("down".into())));
    let state = mocks.state();
    let app = test_app!(state);

    let mut stamps = Vec::new();
    for _ in 0..2 {
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "degraded");
        assert_eq!(body["data"]["database"], "Unavailable");
        stamps.push(body["data"]["timestamp"].clone());
    }
    assert_eq!(stamps[0], stamps[1]);
}
