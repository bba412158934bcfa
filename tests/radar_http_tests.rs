mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use tripline::radar::{Coordinates, LocationReport};
use uuid::Uuid;

use common::app;

const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
const BROOKLYN: (f64, f64) = (40.7306, -73.9352);
const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);

#[tokio::test]
async fn nearby_scenario_includes_close_and_excludes_far_users() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;
    let (bob_id, bob) = app.register_approved("bob").await;
    let (_, carol) = app.register_approved("carol").await;

    for (token, (lat, lng)) in [(&alice, NEW_YORK), (&bob, BROOKLYN), (&carol, LOS_ANGELES)] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/radr/update",
                Some(token),
                Some(json!({ "lat": lat, "lng": lng })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/radr/nearby?lat={}&lng={}", NEW_YORK.0, NEW_YORK.1),
            Some(&alice),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let nearby = body["nearby"].as_array().expect("nearby should be an array");
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0]["userId"], bob_id);
    assert_eq!(nearby[0]["username"], "bob");
    assert_eq!(nearby[0]["lat"], BROOKLYN.0);
    assert_eq!(nearby[0]["lng"], BROOKLYN.1);
    assert!(nearby[0]["lastSeen"].is_string());
    let distance = nearby[0]["distance"].as_f64().expect("distance");
    assert!((5.0..10.0).contains(&distance), "got {distance}");
}

#[tokio::test]
async fn requester_never_sees_themselves() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;

    app.send(
        Method::POST,
        "/api/radr/update",
        Some(&alice),
        Some(json!({ "lat": 1.0, "lng": 1.0 })),
    )
    .await;

    let (status, body) = app
        .send(Method::GET, "/api/radr/nearby?lat=1.0&lng=1.0", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nearby": [] }));
}

#[tokio::test]
async fn query_works_without_prior_report() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;
    let (_, bob) = app.register_approved("bob").await;

    app.send(
        Method::POST,
        "/api/radr/update",
        Some(&bob),
        Some(json!({ "lat": 48.8566, "lng": 2.3522 })),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/radr/nearby?lat=48.86&lng=2.35",
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nearby"].as_array().unwrap().len(), 1);
    assert!(app.state.radar.len().await == 1);
}

#[tokio::test]
async fn report_carries_profile_icon() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;
    let (_, bob) = app.register_approved("bob").await;

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/users/me",
            Some(&bob),
            Some(json!({ "profileIcon": "plane" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.send(
        Method::POST,
        "/api/radr/update",
        Some(&bob),
        Some(json!({ "lat": 10.0, "lng": 10.0 })),
    )
    .await;

    let (_, body) = app
        .send(Method::GET, "/api/radr/nearby?lat=10&lng=10", Some(&alice), None)
        .await;
    assert_eq!(body["nearby"][0]["profileIcon"], "plane");
}

#[tokio::test]
async fn malformed_coordinates_are_rejected_without_mutation() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;

    let bad_bodies = [
        json!({}),
        json!({ "lat": 1.0 }),
        json!({ "lat": "north", "lng": 2.0 }),
        json!({ "lat": null, "lng": 2.0 }),
        json!({ "lat": 200.0, "lng": 2.0 }),
    ];
    for body in bad_bodies {
        let (status, response) = app
            .send(Method::POST, "/api/radr/update", Some(&alice), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {response}");
        assert_eq!(response["code"], "validation_error");
    }

    let (status, _) = app
        .send_raw(Method::POST, "/api/radr/update", Some(&alice), "{not json")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.state.radar.is_empty().await);
}

#[tokio::test]
async fn nearby_requires_numeric_coordinates() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;

    for uri in [
        "/api/radr/nearby",
        "/api/radr/nearby?lat=1.0",
        "/api/radr/nearby?lat=abc&lng=1.0",
    ] {
        let (status, body) = app.send(Method::GET, uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}: {body}");
    }
}

#[tokio::test]
async fn radar_requires_authentication() {
    let app = app().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/radr/update",
            None,
            Some(json!({ "lat": 1.0, "lng": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::GET,
            "/api/radr/nearby?lat=1&lng=1",
            Some("forged.token"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.radar.is_empty().await);
}

#[tokio::test]
async fn stale_presence_is_swept_by_next_report() {
    let app = app().await;
    let (_, alice) = app.register_approved("alice").await;

    let ghost = Uuid::new_v4();
    app.state
        .radar
        .report_at(
            LocationReport {
                user_id: ghost,
                display_name: "ghost".to_string(),
                coordinates: Coordinates::new(1.0, 1.0).unwrap(),
                profile_icon: None,
            },
            Utc::now() - Duration::minutes(3),
        )
        .await;

    let (_, body) = app
        .send(Method::GET, "/api/radr/nearby?lat=1&lng=1", Some(&alice), None)
        .await;
    assert_eq!(body["nearby"].as_array().unwrap().len(), 1);

    app.send(
        Method::POST,
        "/api/radr/update",
        Some(&alice),
        Some(json!({ "lat": 50.0, "lng": 50.0 })),
    )
    .await;

    assert!(app.state.radar.get(ghost).await.is_none());
    let (_, body) = app
        .send(Method::GET, "/api/radr/nearby?lat=1&lng=1", Some(&alice), None)
        .await;
    assert_eq!(body, json!({ "nearby": [] }));
}
