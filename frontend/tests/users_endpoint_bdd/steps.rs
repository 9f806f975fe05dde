//! Step definitions for the users endpoint scenarios.
//!
//! The step macros register these functions for feature-based runs; the
//! scenarios in the parent module call them directly.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use frontend::domain::ports::UsersQuery;
use frontend::domain::{ErrorCode, UserDirectoryService};
use frontend::inbound::view::UsersView;
use frontend::outbound::http::{HttpUserRepository, ReqwestTransport};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

use crate::harness::{SharedWorld, unreachable_users_url, with_world_async};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn service_for(users_url: url::Url) -> UserDirectoryService<HttpUserRepository<ReqwestTransport>> {
    let repository =
        HttpUserRepository::over_reqwest(users_url, REQUEST_TIMEOUT).expect("http client");
    UserDirectoryService::new(Arc::new(repository))
}

#[given("the users endpoint returns two users created at the epoch")]
pub(crate) fn the_users_endpoint_returns_two_users(world: SharedWorld) {
    let body = json!([
        {
            "id": 1,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "createdAt": "1970-01-01T00:00:00Z",
            "updatedAt": "1970-01-01T00:00:00Z"
        },
        {
            "id": 2,
            "firstName": "Grace",
            "lastName": "Hopper",
            "createdAt": "1970-01-01T00:00:00Z",
            "updatedAt": "2024-05-06T07:08:09.000Z",
            "role": "admiral"
        }
    ]);
    world.borrow().endpoint.respond_with(200, body.to_string());
}

#[given("the users endpoint returns an empty list")]
pub(crate) fn the_users_endpoint_returns_an_empty_list(world: SharedWorld) {
    world.borrow().endpoint.respond_with(200, "[]");
}

#[given("the users endpoint fails with status 500")]
pub(crate) fn the_users_endpoint_fails_with_status_500(world: SharedWorld) {
    world
        .borrow()
        .endpoint
        .respond_with(500, r#"{"error":"database offline"}"#);
}

#[given("the users endpoint answers with a malformed payload")]
pub(crate) fn the_users_endpoint_answers_with_a_malformed_payload(world: SharedWorld) {
    world
        .borrow()
        .endpoint
        .respond_with(200, r#"{"users":"not a list"}"#);
}

#[given("the users endpoint is unreachable")]
pub(crate) fn the_users_endpoint_is_unreachable(world: SharedWorld) {
    world.borrow_mut().users_url = unreachable_users_url();
}

#[when("the service lists users")]
pub(crate) fn the_service_lists_users(world: SharedWorld) {
    let result = with_world_async(&world, |users_url| async move {
        service_for(users_url).list_users().await
    });
    world.borrow_mut().results.push(result);
}

#[when("the users view is mounted")]
pub(crate) fn the_users_view_is_mounted(world: SharedWorld) {
    let rendered = with_world_async(&world, |users_url| async move {
        let mut view = UsersView::new(Arc::new(service_for(users_url)));
        view.mount();
        view.wait_until_settled().await;
        let rendered = view.render();
        view.unmount();
        rendered
    });
    world.borrow_mut().rendered = Some(rendered);
}

#[then("two users are returned in source order")]
pub(crate) fn two_users_are_returned_in_source_order(world: SharedWorld) {
    let ctx = world.borrow();
    let users = ctx
        .results
        .last()
        .expect("users requested")
        .as_ref()
        .expect("users listed");
    let ids = users.iter().map(|user| user.id()).collect::<Vec<_>>();
    assert_eq!(ids, [1, 2]);
    assert_eq!(users[0].full_name(), "Ada Lovelace");
    assert_eq!(users[1].full_name(), "Grace Hopper");
    assert_eq!(users[0].created_at(), DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(users[1].updated_at().to_rfc3339(), "2024-05-06T07:08:09+00:00");
}

#[then("no users are returned")]
pub(crate) fn no_users_are_returned(world: SharedWorld) {
    let ctx = world.borrow();
    let users = ctx
        .results
        .last()
        .expect("users requested")
        .as_ref()
        .expect("users listed");
    assert!(users.is_empty());
}

#[then("the request fails with a transport error carrying status 500")]
pub(crate) fn the_request_fails_with_a_transport_error(world: SharedWorld) {
    let ctx = world.borrow();
    let error = ctx
        .results
        .last()
        .expect("users requested")
        .as_ref()
        .expect_err("request should fail");
    assert_eq!(error.code(), ErrorCode::TransportError);
    assert_eq!(
        error.details(),
        Some(&json!({ "status": 500, "statusText": "Internal Server Error" }))
    );
}

#[then("the request fails with a decode error")]
pub(crate) fn the_request_fails_with_a_decode_error(world: SharedWorld) {
    let ctx = world.borrow();
    let error = ctx
        .results
        .last()
        .expect("users requested")
        .as_ref()
        .expect_err("request should fail");
    assert_eq!(error.code(), ErrorCode::DecodeError);
}

#[then("the request fails with a network error")]
pub(crate) fn the_request_fails_with_a_network_error(world: SharedWorld) {
    let ctx = world.borrow();
    let error = ctx
        .results
        .last()
        .expect("users requested")
        .as_ref()
        .expect_err("request should fail");
    assert_eq!(error.code(), ErrorCode::NetworkError);
}

#[then("the view renders the transport failure")]
pub(crate) fn the_view_renders_the_transport_failure(world: SharedWorld) {
    let ctx = world.borrow();
    assert_eq!(
        ctx.rendered.as_deref(),
        Some(
            "could not load users [transport_error]: \
             user directory request failed: 500 Internal Server Error"
        )
    );
}

#[then("the view renders one line per user")]
pub(crate) fn the_view_renders_one_line_per_user(world: SharedWorld) {
    let ctx = world.borrow();
    let rendered = ctx.rendered.as_deref().expect("view rendered");
    insta::assert_snapshot!(rendered, @r"
    #1 Ada Lovelace (joined 1970-01-01T00:00:00Z, updated 1970-01-01T00:00:00Z)
    #2 Grace Hopper (joined 1970-01-01T00:00:00Z, updated 2024-05-06T07:08:09Z)
    ");
}

#[then("both fetches agree and the endpoint was hit twice")]
pub(crate) fn both_fetches_agree_and_the_endpoint_was_hit_twice(world: SharedWorld) {
    let ctx = world.borrow();
    let [first, second] = ctx.results.as_slice() else {
        panic!("expected two results, got {}", ctx.results.len());
    };
    assert_eq!(
        first.as_ref().expect("first fetch"),
        second.as_ref().expect("second fetch")
    );
    assert_eq!(ctx.endpoint.hits(), 2);
}

#[then("every request asked for JSON")]
pub(crate) fn every_request_asked_for_json(world: SharedWorld) {
    let ctx = world.borrow();
    let accept_headers = ctx.endpoint.accept_headers();
    assert!(!accept_headers.is_empty());
    assert!(
        accept_headers
            .iter()
            .all(|accept| accept.as_deref() == Some("application/json")),
        "unexpected accept headers: {accept_headers:?}"
    );
}
