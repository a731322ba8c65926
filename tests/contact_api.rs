#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use uuid::Uuid;

use common::*;
use portfolio_api::entities::contact::{BulkAction, ContactStatus};

fn form() -> Value {
    json!({
        "name": "Grace Hopper",
        "email": "Grace@Example.com",
        "subject": "Collaboration",
        "message": "Would love to work together on a compiler."
    })
}

#[actix_web::test]
async fn submission_is_stored_with_the_client_address() {
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_create_contact()
        .withf(|insert| insert.email == "grace@example.com" && insert.ip_address.as_deref() == Some("198.51.100.4"))
        .times(1)
        .returning(|_| Ok(contact(ContactStatus::Unread)));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .peer_addr("198.51.100.4:443".parse().unwrap())
        .set_json(form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["_id"].is_string());
    assert!(body["data"].get("email").is_none());
    assert!(body["message"].as_str().unwrap().starts_with("Thank you"));
}

#[actix_web::test]
async fn sixth_submission_within_the_hour_is_throttled() {
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_create_contact()
        .times(5)
        .returning(|_| Ok(contact(ContactStatus::Unread)));
    let state = mocks.state();
    let app = test_app!(state);

    for attempt in 1..=6 {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr("203.0.113.50:9000".parse().unwrap())
            .set_json(form())
            .to_request();
        let resp = test::call_service(&app, req).await;
        if attempt <= 5 {
            assert_eq!(resp.status(), StatusCode::CREATED, "attempt {attempt}");
        } else {
            assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
            assert!(resp.headers().contains_key("retry-after"));
        }
    }
}

#[actix_web::test]
async fn rejected_submissions_do_not_count_towards_the_hourly_limit() {
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_create_contact()
        .times(5)
        .returning(|_| Ok(contact(ContactStatus::Unread)));
    let state = mocks.state();
    let app = test_app!(state);

    let mut invalid = form();
    invalid["message"] = json!("          ");
    for _ in 0..6 {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr("203.0.113.77:9000".parse().unwrap())
            .set_json(&invalid)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    for attempt in 1..=5 {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr("203.0.113.77:9000".parse().unwrap())
            .set_json(form())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED, "attempt {attempt}");
    }
}

#[actix_web::test]
async fn short_message_is_rejected() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_create_contact().never();
    let state = mocks.state();
    let app = test_app!(state);

    let mut payload = form();
    payload["message"] = json!("hi");
    let req = test::TestRequest::post().uri("/api/contact").set_json(payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"][0]["field"], "message");
}

#[actix_web::test]
async fn inbox_is_admin_only() {
    let state = Mocks::default().state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/contact").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/contact")
        .insert_header(bearer(&user(portfolio_api::entities::user::UserRole::User)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn inbox_lists_a_page_with_the_unread_count() {
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_list_contacts()
        .withf(|status, limit, offset| status.is_none() && *limit == 2 && *offset == 2)
        .times(1)
        .returning(|_, _, _| Ok(vec![contact(ContactStatus::Read)]));
    mocks
        .contacts
        .expect_count_contacts()
        .withf(|status| status.is_none())
        .returning(|_| Ok(3));
    mocks
        .contacts
        .expect_count_contacts()
        .withf(|status| *status == Some(ContactStatus::Unread))
        .returning(|_| Ok(1));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/contact?page=2&limit=2")
        .insert_header(admin_bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["message"], "1 unread");
}

#[actix_web::test]
async fn bulk_needs_at_least_one_id() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_bulk_update().never();
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact/bulk")
        .insert_header(admin_bearer())
        .set_json(json!({ "ids": [], "action": "archive" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"][0]["field"], "ids");
}

#[actix_web::test]
async fn bulk_reports_affected_rows() {
    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    let expected = ids.clone();
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_bulk_update()
        .withf(move |ids, action| ids == expected.as_slice() && *action == BulkAction::MarkRead)
        .times(1)
        .returning(|_, _| Ok(2));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact/bulk")
        .insert_header(admin_bearer())
        .set_json(json!({ "ids": ids, "action": "markRead" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["affected"], 2);
}

#[actix_web::test]
async fn reply_without_mail_service_is_unavailable() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_record_reply().never();
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact/reply")
        .insert_header(admin_bearer())
        .set_json(json!({ "id": Uuid::new_v4(), "message": "Thanks, let's talk next week." }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn generated_reply_falls_back_to_template() {
    let message = contact(ContactStatus::Unread);
    let id = message.id;
    let mut mocks = Mocks::default();
    mocks
        .contacts
        .expect_get_contact()
        .withf(move |requested| *requested == id)
        .returning(move |_| Ok(Some(message.clone())));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact/generate-ai-reply")
        .insert_header(admin_bearer())
        .set_json(json!({ "id": id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["generated"], false);
    let reply = body["data"]["reply"].as_str().unwrap();
    assert!(reply.starts_with("Hi Grace Hopper"));
    assert!(reply.contains("\"Collaboration\""));
}

#[actix_web::test]
async fn unknown_message_is_not_found() {
    let mut mocks = Mocks::default();
    mocks.contacts.expect_get_contact().returning(|_| Ok(None));
    let state = mocks.state();
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/contact/{}", Uuid::new_v4()))
        .insert_header(admin_bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Message not found");
}
