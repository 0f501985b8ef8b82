//! Behaviour tests for the client record lifecycle over HTTP.
//!
//! Scenarios drive the real handlers and `ClientService` over the in-memory
//! repository, with a clock the steps advance explicitly.

use std::cell::RefCell;
use std::sync::Arc;

use actix_web::rt::{System, SystemRunner};
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use chrono::{TimeZone, Utc};
use client_registry::domain::ClientService;
use client_registry::inbound::http::configure;
use client_registry::inbound::http::state::HttpState;
use client_registry::test_support::{InMemoryClientRepository, MutableClock};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

struct LifecycleWorld {
    runner: SystemRunner,
    repository: Arc<InMemoryClientRepository>,
    clock: Arc<MutableClock>,
    state: HttpState,
    last_status: RefCell<Option<u16>>,
    last_body: RefCell<Value>,
    first_created: RefCell<Option<Value>>,
}

impl LifecycleWorld {
    fn new() -> Self {
        let repository = Arc::new(InMemoryClientRepository::new());
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let clock = Arc::new(MutableClock::new(start));
        let service = ClientService::new(repository.clone(), clock.clone());
        Self {
            runner: System::new(),
            repository,
            clock,
            state: HttpState::from_service(Arc::new(service)),
            last_status: RefCell::new(None),
            last_body: RefCell::new(Value::Null),
            first_created: RefCell::new(None),
        }
    }

    fn send(&self, request: TestRequest) -> (u16, Value) {
        let state = self.state.clone();
        let (status, body) = self.runner.block_on(async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .configure(configure),
            )
            .await;
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let bytes = actix_test::read_body(response).await;
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, body)
        });
        *self.last_status.borrow_mut() = Some(status);
        *self.last_body.borrow_mut() = body.clone();
        (status, body)
    }

    fn create(&self, payload: Value) -> (u16, Value) {
        self.clock.advance_seconds(1);
        self.send(TestRequest::post().uri("/clients").set_json(payload))
    }

    fn first_id(&self) -> String {
        self.first_created
            .borrow()
            .as_ref()
            .and_then(|client| client["id"].as_str().map(str::to_owned))
            .expect("a client was created")
    }
}

fn candidate(reporter_name: &str, reporter_phone: &str) -> Value {
    json!({
        "whatsappGroupName": "ops",
        "bid": 5,
        "uid": 9,
        "mtcGroupID": 21,
        "reporterName": reporter_name,
        "reporterPhone": reporter_phone,
        "compId": "C1",
        "userName": "C1",
        "password": "p",
        "appGuid": "77C8F2FD-B1DE-4CEA-BE74-FD943B3BD54D"
    })
}

fn reporter(number: usize) -> String {
    format!("reporter-{number:02}")
}

#[fixture]
fn world() -> LifecycleWorld {
    LifecycleWorld::new()
}

#[given("an empty client registry")]
fn an_empty_client_registry(world: &LifecycleWorld) {
    assert!(world.repository.records().is_empty());
}

#[given("a registry with {count} clients")]
fn a_registry_with_clients(world: &LifecycleWorld, count: usize) {
    for number in 1..=count {
        let (status, body) = world.create(candidate(&reporter(number), "+972501234567"));
        assert_eq!(status, 201, "seeding failed: {body}");
        if number == 1 {
            *world.first_created.borrow_mut() = Some(body);
        }
    }
}

#[when("a valid client for group {group} is created")]
fn a_valid_client_is_created(world: &LifecycleWorld, group: String) {
    let mut payload = candidate("Dana", "+972501234567");
    payload["whatsappGroupName"] = Value::String(group);
    let (_, body) = world.create(payload);
    *world.first_created.borrow_mut() = Some(body);
}

#[when("a client with reporter phone {phone} is created")]
fn a_client_with_phone_is_created(world: &LifecycleWorld, phone: String) {
    world.create(candidate("Dana", &phone));
}

#[when("page {page} with limit {limit} is listed oldest first")]
fn a_page_is_listed(world: &LifecycleWorld, page: u32, limit: u32) {
    let uri = format!("/clients?page={page}&limit={limit}&sortBy=createdAt&sortOrder=asc");
    world.send(TestRequest::get().uri(&uri));
}

#[when("the first client is renamed to {name}")]
fn the_first_client_is_renamed(world: &LifecycleWorld, name: String) {
    world.clock.advance_seconds(60);
    let uri = format!("/clients?id={}", world.first_id());
    world.send(
        TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "reporterName": name })),
    );
}

#[when("the first client is deleted")]
fn the_first_client_is_deleted(world: &LifecycleWorld) {
    let uri = format!("/clients?id={}", world.first_id());
    world.send(TestRequest::delete().uri(&uri));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &LifecycleWorld, status: u16) {
    assert_eq!(
        *world.last_status.borrow(),
        Some(status),
        "body: {}",
        world.last_body.borrow()
    );
}

#[then("fetching the created client returns the same record")]
fn fetching_returns_the_same_record(world: &LifecycleWorld) {
    let created = world.first_created.borrow().clone().expect("created client");
    let uri = format!("/clients?id={}", world.first_id());
    let (status, fetched) = world.send(TestRequest::get().uri(&uri));
    assert_eq!(status, 200);
    assert_eq!(fetched, created);
    assert_eq!(fetched["createdAt"], fetched["updatedAt"]);
}

#[then("the error message mentions {field}")]
fn the_error_message_mentions(world: &LifecycleWorld, field: String) {
    let body = world.last_body.borrow();
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains(&field), "{message}");
}

#[then("the registry holds {count} clients")]
fn the_registry_holds(world: &LifecycleWorld, count: usize) {
    assert_eq!(world.repository.records().len(), count);
}

#[then("the listing total is {total}")]
fn the_listing_total_is(world: &LifecycleWorld, total: u64) {
    assert_eq!(world.last_body.borrow()["total"], total);
}

#[then("the listed reporters are numbers {first} to {last}")]
fn the_listed_reporters_are(world: &LifecycleWorld, first: usize, last: usize) {
    let body = world.last_body.borrow();
    let names: Vec<String> = body["clients"]
        .as_array()
        .expect("clients array")
        .iter()
        .filter_map(|client| client["reporterName"].as_str().map(str::to_owned))
        .collect();
    let expected: Vec<String> = (first..=last).map(reporter).collect();
    assert_eq!(names, expected);
}

#[then("only the reporter name and update time changed")]
fn only_name_and_update_time_changed(world: &LifecycleWorld) {
    let before = world.first_created.borrow().clone().expect("created client");
    let after = world.last_body.borrow().clone();
    let before = before.as_object().expect("object");
    let after = after.as_object().expect("object");

    assert_eq!(before.len(), after.len());
    for (key, value) in before {
        match key.as_str() {
            "reporterName" => assert_eq!(after[key], "Noa"),
            "updatedAt" => assert_ne!(&after[key], value),
            _ => assert_eq!(&after[key], value, "{key} changed"),
        }
    }
}

#[scenario(
    path = "tests/features/client_lifecycle.feature",
    name = "Created clients can be fetched by id"
)]
fn created_clients_can_be_fetched(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/client_lifecycle.feature",
    name = "Invalid clients are rejected without being stored"
)]
fn invalid_clients_are_rejected(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/client_lifecycle.feature",
    name = "Listing pages through clients oldest first"
)]
fn listing_pages_oldest_first(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/client_lifecycle.feature",
    name = "Renaming a reporter leaves other fields alone"
)]
fn renaming_leaves_other_fields(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/client_lifecycle.feature",
    name = "Deleting a client twice reports not found the second time"
)]
fn deleting_twice_reports_not_found(world: LifecycleWorld) {
    let _ = world;
}
