//! Handler tests for the client endpoints over an in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::ClientService;
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::test_support::{InMemoryClientRepository, MutableClock};

struct Harness {
    repository: Arc<InMemoryClientRepository>,
    clock: Arc<MutableClock>,
    state: HttpState,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryClientRepository::new());
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let clock = Arc::new(MutableClock::new(start));
    let service = ClientService::new(repository.clone(), clock.clone());
    Harness {
        repository,
        clock,
        state: HttpState::from_service(Arc::new(service)),
    }
}

fn candidate(reporter_name: &str) -> Value {
    json!({
        "whatsappGroupName": "ops",
        "bid": 5,
        "uid": 9,
        "mtcGroupID": 21,
        "reporterName": reporter_name,
        "reporterPhone": "+972501234567",
        "compId": "C1",
        "userName": "C1",
        "password": "p",
        "appGuid": "77C8F2FD-B1DE-4CEA-BE74-FD943B3BD54D"
    })
}

macro_rules! init_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn create_then_fetch_by_id(harness: Harness) {
    let app = init_app!(harness.state);

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(candidate("Dana"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    let id = created["id"].as_str().expect("id assigned").to_owned();
    assert_eq!(created["mtcGroupID"], 21);
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/clients?id={id}"))
        .to_request();
    let fetched: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(fetched, created);
}

#[rstest]
#[actix_web::test]
async fn invalid_payloads_are_rejected_with_field_details(harness: Harness) {
    let app = init_app!(harness.state);

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(json!({ "reporterPhone": "0501234567", "id": "x" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    let message = body["error"].as_str().expect("message");
    assert!(message.contains("\"bid\" is required"));
    assert!(message.contains("\"id\" is not allowed"));
    assert!(body["details"]["errors"].as_array().is_some());
    assert!(harness.repository.records().is_empty());
}

#[rstest]
#[case("[1, 2]")]
#[case("{not json")]
#[actix_web::test]
async fn malformed_bodies_are_bad_requests(harness: Harness, #[case] body: &'static str) {
    let app = init_app!(harness.state);

    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case("/clients?id=3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("/clients?id=not-a-uuid")]
#[actix_web::test]
async fn unknown_ids_are_not_found(harness: Harness, #[case] uri: &str) {
    let app = init_app!(harness.state);

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], "Client not found");
}

#[rstest]
#[actix_web::test]
async fn listing_pages_with_metadata(harness: Harness) {
    let app = init_app!(harness.state);
    for index in 0..12 {
        harness.clock.advance_seconds(1);
        let request = actix_test::TestRequest::post()
            .uri("/clients")
            .set_json(candidate(&format!("reporter-{index:02}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = actix_test::TestRequest::get()
        .uri("/clients?page=2&limit=5&sortBy=createdAt&sortOrder=asc")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 5);
    let names: Vec<&str> = body["clients"]
        .as_array()
        .expect("clients array")
        .iter()
        .filter_map(|client| client["reporterName"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["reporter-05", "reporter-06", "reporter-07", "reporter-08", "reporter-09"]
    );
}

#[rstest]
#[case("/clients")]
#[case("/clients?sortOrder=desc")]
#[case("/clients?sortBy=createdAt&sortOrder=desc")]
#[actix_web::test]
async fn listing_defaults_to_newest_first(harness: Harness, #[case] uri: &str) {
    let app = init_app!(harness.state);
    for name in ["r0", "r1", "r2", "r3"] {
        harness.clock.advance_seconds(1);
        let request = actix_test::TestRequest::post()
            .uri("/clients")
            .set_json(candidate(name))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    let clients = body["clients"].as_array().expect("clients array");
    let names: Vec<&str> = clients
        .iter()
        .filter_map(|client| client["reporterName"].as_str())
        .collect();
    assert_eq!(names, vec!["r3", "r2", "r1", "r0"]);
    let created: Vec<&str> = clients
        .iter()
        .filter_map(|client| client["createdAt"].as_str())
        .collect();
    assert!(created.windows(2).all(|pair| pair[0] > pair[1]));
}

#[rstest]
#[case("/clients?limit=1000")]
#[case("/clients?sortBy=password")]
#[case("/clients?sortOrder=sideways")]
#[case("/clients?page=abc")]
#[actix_web::test]
async fn bad_listing_options_are_rejected(harness: Harness, #[case] uri: &str) {
    let app = init_app!(harness.state);

    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn patch_changes_only_named_fields(harness: Harness) {
    let app = init_app!(harness.state);
    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(candidate("Dana"))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, request).await;
    let id = created["id"].as_str().expect("id").to_owned();

    harness.clock.advance_seconds(30);
    let request = actix_test::TestRequest::patch()
        .uri(&format!("/clients?id={id}"))
        .set_json(json!({ "reporterName": "Noa" }))
        .to_request();
    let updated: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(updated["reporterName"], "Noa");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    assert_eq!(updated["bid"], created["bid"]);
    assert_eq!(updated["reporterPhone"], created["reporterPhone"]);
}

#[rstest]
#[actix_web::test]
async fn delete_reports_success_then_not_found(harness: Harness) {
    let app = init_app!(harness.state);
    let request = actix_test::TestRequest::post()
        .uri("/clients")
        .set_json(candidate("Dana"))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, request).await;
    let uri = format!("/clients?id={}", created["id"].as_str().expect("id"));

    let request = actix_test::TestRequest::delete().uri(&uri).to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["message"], "Client deleted successfully");

    let request = actix_test::TestRequest::delete().uri(&uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(actix_test::TestRequest::delete())]
#[case(actix_test::TestRequest::patch().set_json(json!({ "bid": 1 })))]
#[actix_web::test]
async fn mutations_without_id_are_bad_requests(
    harness: Harness,
    #[case] request: actix_test::TestRequest,
) {
    let app = init_app!(harness.state);

    let response = actix_test::call_service(&app, request.uri("/clients").to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], "Client ID is required");
}

#[rstest]
#[actix_web::test]
async fn active_lookup_returns_earliest_group_member(harness: Harness) {
    let app = init_app!(harness.state);
    for name in ["first", "second"] {
        harness.clock.advance_seconds(1);
        let request = actix_test::TestRequest::post()
            .uri("/clients")
            .set_json(candidate(name))
            .to_request();
        actix_test::call_service(&app, request).await;
    }

    let request = actix_test::TestRequest::get()
        .uri("/clients/active?whatsappGroupName=ops")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["reporterName"], "first");

    let request = actix_test::TestRequest::get()
        .uri("/clients/active?whatsappGroupName=elsewhere")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = actix_test::TestRequest::get()
        .uri("/clients/active")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn storage_outages_are_redacted_internal_errors(harness: Harness) {
    let app = init_app!(harness.state);
    harness.repository.set_unavailable(true);

    let request = actix_test::TestRequest::get().uri("/clients").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["error"], "Internal server error");
}
