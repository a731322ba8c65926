#[macro_use]
mod common;

use actix_web::{cookie::Cookie, http::StatusCode, test};
use serde_json::{json, Value};

use common::*;
use portfolio_api::entities::user::UserRole;

#[actix_web::test]
async fn login_sets_an_http_only_cookie_that_authenticates() {
    let account = user(UserRole::Admin);
    let lookup = account.clone();
    let by_id = account.clone();

    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .returning(move |_| Ok(Some(lookup.clone())));
    mocks
        .users
        .expect_get_user_by_id()
        .times(1)
        .returning(move |_| Ok(Some(by_id.clone())));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ADA@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .expect("auth cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age().map(|d| d.whole_minutes()), Some(60));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert_eq!(body["data"]["token"], cookie.value());

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .cookie(Cookie::new("token", cookie.value().to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["_id"], account.id.to_string());
    assert_eq!(body["data"]["role"], "admin");
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let account = user(UserRole::User);
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .returning(move |email| Ok((email == "ada@example.com").then(|| account.clone())));
    let state = mocks.state();
    let app = test_app!(state);

    for (email, password) in [("ada@example.com", "Wrong-Password-1"), ("nobody@example.com", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Wrong credentials");
    }
}

#[actix_web::test]
async fn login_is_rate_limited_per_client() {
    let mut mocks = Mocks::default();
    mocks.users.expect_get_user_by_email().returning(|_| Ok(None));
    let mut config = test_config();
    config.login_limit_per_minute = 2;
    let state = mocks.state_with(config);
    let app = test_app!(state);

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.0.0.9:5000".parse().unwrap())
            .set_json(json!({ "email": "ada@example.com", "password": "whatever" }))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }
    assert_eq!(statuses, vec![StatusCode::UNAUTHORIZED, StatusCode::UNAUTHORIZED, StatusCode::TOO_MANY_REQUESTS]);
}

#[actix_web::test]
async fn malformed_logins_do_not_use_up_the_limit() {
    let mut mocks = Mocks::default();
    mocks.users.expect_get_user_by_email().times(2).returning(|_| Ok(None));
    let mut config = test_config();
    config.login_limit_per_minute = 2;
    let state = mocks.state_with(config);
    let app = test_app!(state);

    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.0.0.10:5000".parse().unwrap())
            .set_json(json!({ "email": "not-an-email", "password": "" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("10.0.0.10:5000".parse().unwrap())
            .set_json(json!({ "email": " Ada@Example.com ", "password": "whatever" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn first_registration_is_open_and_later_ones_are_closed() {
    let mut mocks = Mocks::default();
    let mut seq = mockall::Sequence::new();
    mocks.users.expect_count_users().times(1).in_sequence(&mut seq).returning(|| Ok(0));
    mocks.users.expect_count_users().times(1).in_sequence(&mut seq).returning(|| Ok(1));
    mocks
        .users
        .expect_create_user()
        .withf(|insert| insert.email == "ada@example.com" && insert.password_hash.starts_with("$argon2id$"))
        .times(1)
        .returning(|_| Ok(user(UserRole::Admin)));
    let state = mocks.state();
    let app = test_app!(state);

    let payload = json!({ "name": "Ada Lovelace", "email": "Ada@Example.com", "password": PASSWORD });

    let req = test::TestRequest::post().uri("/api/auth/register").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "admin");

    let req = test::TestRequest::post().uri("/api/auth/register").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn weak_passwords_are_rejected_on_register() {
    let mut mocks = Mocks::default();
    mocks.users.expect_create_user().never();
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"][0]["field"], "password");
}

#[actix_web::test]
async fn password_change_needs_the_current_password() {
    let account = user(UserRole::User);
    let found = account.clone();
    let mut mocks = Mocks::default();
    mocks.users.expect_get_user_by_id().returning(move |_| Ok(Some(found.clone())));
    mocks.users.expect_update_user().never();
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/auth/update")
        .insert_header(bearer(&account))
        .set_json(json!({ "currentPassword": "not-it", "newPassword": "An0ther&Strong-Passphrase" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_requires_a_session() {
    let state = Mocks::default().state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_clears_the_cookie() {
    let state = Mocks::default().state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(admin_bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "token")
        .expect("cleared cookie")
        .into_owned();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age().map(|d| d.whole_seconds()), Some(0));
}
