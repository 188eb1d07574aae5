//! AlertsSync integration tests
//!
//! Drives the alerts sync unit against a mock backend: mapping and
//! ordering, polling cadence, disposal and failure handling.

use crate::common::*;
use crate::{assert_contains, assert_in_range};
use pretty_assertions::assert_eq;
use salama::client::{AlertsQuery, AlertsSync};
use salama::shared::AlertKind;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_initial_fetch_maps_and_orders_most_recent_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            alert_json(1, "High", "2024-06-01T10:00:00"),
            alert_json(3, "low", "2024-06-01T12:00:00"),
            alert_json(2, "Medium", "2024-06-01T11:00:00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = AlertsSync::observe(client_for(&server), AlertsQuery::new(5, 0));
    let state = wait_for_state(&mut sync.subscribe(), |s| !s.is_loading).await;

    assert_eq!(state.error_message, None);
    let ids: Vec<i64> = state.data.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    let kinds: Vec<AlertKind> = state.data.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::Info, AlertKind::Warning, AlertKind::Critical]);
    assert_eq!(state.data[2].location, "Camera 10");
    assert_eq!(state.data[2].object_detected, "Unspecified Object");
}

#[tokio::test]
async fn test_without_polling_fetches_exactly_once() {
    let server = MockServer::start().await;
    mount_alert_list(&server, json!([alert_json(1, "High", "2024-06-01T10:00:00")])).await;

    let sync = AlertsSync::observe(
        client_for(&server),
        AlertsQuery::new(10, 0).with_refresh_interval(Duration::ZERO),
    );
    wait_for_state(&mut sync.subscribe(), |s| !s.is_loading).await;
    assert!(!sync.is_polling());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(request_count(&server, "/alerts/").await, 1);

    sync.refetch().await;
    assert_eq!(request_count(&server, "/alerts/").await, 2);
    assert_eq!(sync.metrics().total_fetches, 2);
}

#[tokio::test]
async fn test_polling_cadence_and_dispose_stops_updates() {
    let server = MockServer::start().await;
    mount_alert_list(&server, json!([alert_json(1, "High", "2024-06-01T10:00:00")])).await;

    let sync = AlertsSync::observe(
        client_for(&server),
        AlertsQuery::new(10, 0).with_refresh_interval(Duration::from_millis(1000)),
    );
    assert!(sync.is_polling());

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let fetched = request_count(&server, "/alerts/").await;
    assert_in_range!(fetched, 3, 4);

    let mut rx = sync.subscribe();
    drop(sync);
    tokio::time::sleep(Duration::from_millis(200)).await;
    let after_dispose = request_count(&server, "/alerts/").await;

    let probe_fired = Arc::new(AtomicBool::new(false));
    let probe = {
        let probe_fired = Arc::clone(&probe_fired);
        tokio::spawn(async move {
            if rx.changed().await.is_ok() {
                probe_fired.store(true, Ordering::SeqCst);
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!probe_fired.load(Ordering::SeqCst), "state changed after dispose");
    assert_eq!(request_count(&server, "/alerts/").await, after_dispose);
    probe.abort();
}

#[tokio::test]
async fn test_refetch_failure_keeps_previous_alerts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            alert_json(1, "High", "2024-06-01T10:00:00"),
            alert_json(2, "Low", "2024-06-01T09:00:00"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let sync = AlertsSync::observe(client_for(&server), AlertsQuery::default());
    let first = wait_for_state(&mut sync.subscribe(), |s| !s.is_loading).await;
    assert_eq!(first.data.len(), 2);

    sync.refetch().await;
    let state = sync.state();
    assert!(!state.is_loading);
    assert_eq!(state.data, first.data);
    let error = state.error_message.expect("error message after failed refetch");
    assert_contains!(error, "status: 500");
    assert_contains!(error, "database unavailable");
    assert_eq!(sync.metrics().failed_fetches, 1);
}

#[tokio::test]
async fn test_unreachable_backend_on_first_mount() {
    let sync = AlertsSync::observe(unreachable_client().await, AlertsQuery::default());
    let state = wait_for_state(&mut sync.subscribe(), |s| !s.is_loading).await;

    assert!(state.data.is_empty());
    let error = state.error_message.expect("error message");
    assert_contains!(error, "Network error. Please check your connection.");
}

#[tokio::test]
async fn test_set_query_fetches_new_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            alert_json(1, "High", "2024-06-01T10:00:00")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("skip", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            alert_json(7, "Medium", "2024-06-01T08:00:00")
        ])))
        .mount(&server)
        .await;

    let mut sync = AlertsSync::observe(client_for(&server), AlertsQuery::new(1, 0));
    let mut rx = sync.subscribe();
    wait_for_state(&mut rx, |s| s.data.first().map(|a| a.id) == Some(1)).await;

    sync.set_query(AlertsQuery::new(1, 1));
    let state = wait_for_state(&mut rx, |s| s.data.first().map(|a| a.id) == Some(7)).await;
    assert_eq!(state.data.len(), 1);
    assert_eq!(sync.query(), AlertsQuery::new(1, 1));
}

#[tokio::test]
async fn test_response_for_replaced_query_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("skip", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([alert_json(1, "High", "2024-06-01T10:00:00")]))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts/"))
        .and(query_param("skip", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            alert_json(6, "Low", "2024-06-01T08:00:00")
        ])))
        .mount(&server)
        .await;

    let mut sync = AlertsSync::observe(client_for(&server), AlertsQuery::new(5, 0));
    wait_for_requests(&server, "/alerts/", 1).await;
    sync.set_query(AlertsQuery::new(5, 5));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let ids: Vec<i64> = sync.state().data.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![6]);
    assert_eq!(sync.metrics().discarded_fetches, 1);
}

#[tokio::test]
async fn test_set_query_without_interval_stops_polling() {
    let server = MockServer::start().await;
    mount_alert_list(&server, json!([alert_json(1, "High", "2024-06-01T10:00:00")])).await;

    let mut sync = AlertsSync::observe(
        client_for(&server),
        AlertsQuery::new(10, 0).with_refresh_interval(Duration::from_millis(200)),
    );
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(request_count(&server, "/alerts/").await >= 3);

    sync.set_query(AlertsQuery::new(10, 0).with_refresh_interval(Duration::ZERO));
    assert!(!sync.is_polling());

    tokio::time::sleep(Duration::from_millis(300)).await;
    let after_change = request_count(&server, "/alerts/").await;
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(request_count(&server, "/alerts/").await, after_change);

    let state = sync.state();
    assert!(!state.is_loading);
    assert_eq!(state.data.len(), 1);
}

#[tokio::test]
async fn test_set_query_restarts_timer_with_new_interval() {
    let server = MockServer::start().await;
    mount_alert_list(&server, json!([alert_json(1, "High", "2024-06-01T10:00:00")])).await;

    let mut sync = AlertsSync::observe(
        client_for(&server),
        AlertsQuery::new(10, 0).with_refresh_interval(Duration::from_secs(5)),
    );
    wait_for_requests(&server, "/alerts/", 1).await;

    let changed = tokio::time::Instant::now();
    sync.set_query(AlertsQuery::new(10, 0).with_refresh_interval(Duration::from_millis(300)));
    assert!(sync.is_polling());

    // Immediate fetch plus ticks at 300, 600 and 900 ms.
    tokio::time::sleep_until(changed + Duration::from_millis(1050)).await;
    let fetched = request_count(&server, "/alerts/").await;
    assert_in_range!(fetched, 4, 6);
}

#[tokio::test]
async fn test_refetch_keeps_poll_cadence() {
    let server = MockServer::start().await;
    mount_alert_list(&server, json!([alert_json(1, "High", "2024-06-01T10:00:00")])).await;

    let started = tokio::time::Instant::now();
    let sync = AlertsSync::observe(
        client_for(&server),
        AlertsQuery::new(10, 0).with_refresh_interval(Duration::from_millis(1000)),
    );
    wait_for_requests(&server, "/alerts/", 1).await;

    tokio::time::sleep_until(started + Duration::from_millis(500)).await;
    sync.refetch().await;
    assert_eq!(request_count(&server, "/alerts/").await, 2);

    // A reset timer would not fire until 1500 ms.
    tokio::time::sleep_until(started + Duration::from_millis(1300)).await;
    assert_eq!(request_count(&server, "/alerts/").await, 3);

    tokio::time::sleep_until(started + Duration::from_millis(2300)).await;
    assert_eq!(request_count(&server, "/alerts/").await, 4);
    assert!(sync.is_polling());
}
