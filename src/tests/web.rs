use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for .oneshot()

use crate::app_state::AppState;
use crate::config::DssConfig;
use crate::store_json::JsonProjectStore;
use crate::web::build_router;

fn test_app(ranked: bool) -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonProjectStore::new(dir.path().join("projects.json"));
    let config = DssConfig {
        ranked_recommendation: ranked,
        ..DssConfig::default()
    };
    let state = Arc::new(AppState::new(Box::new(store), &config));
    (build_router(state), dir)
}

fn post(uri: &str, role: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json");
    if let Some(role) = role {
        builder = builder.header("x-dss-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn submission(title: &str) -> Value {
    json!({
        "email": "planner@example.com",
        "title": title,
        "involvement": "Planner",
        "application": 0,
        "country": "Ireland",
        "version": "2020",
        "date_of_project": "2019-06-01"
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn anonymous_guest_can_submit_a_project() {
    let (app, _dir) = test_app(false);

    let response = app
        .oneshot(post("/api/project/add", None, submission("Bridge refit")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn guest_cannot_reach_admin_endpoints() {
    let (app, _dir) = test_app(false);

    let response = app
        .clone()
        .oneshot(post("/api/project/accept/1", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post("/api/project/accept/1", Some("expert"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_role_header_is_rejected() {
    let (app, _dir) = test_app(false);

    let response = app
        .oneshot(post("/api/recommend", Some("warlock"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn submission_rejects_bad_email() {
    let (app, _dir) = test_app(false);

    let mut bad = submission("Bad email");
    bad["email"] = json!("not-an-address");
    let response = app
        .oneshot(post("/api/project/add", None, bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_workflow_add_accept_score_history_recommend() {
    let (app, _dir) = test_app(false);

    let response = app
        .clone()
        .oneshot(post("/api/project/add", None, submission("Hospital wing")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post("/api/project/accept/1", Some("admin"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post(
            "/api/project/score",
            Some("expert"),
            json!({
                "project_id": 1,
                "cm_restrictions": [0, 1, 2, 0, 1, 2, 0, 1, 2],
                "attribute_ratings": [5, 5, 5, 5, 5, 5, 5, 5, 5]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post("/api/project/history/1", Some("admin"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Exact constraint profile finds the reference project.
    let response = app
        .clone()
        .oneshot(post(
            "/api/recommend",
            None,
            json!({ "cm_restrictions": [0, 1, 2, 0, 1, 2, 0, 1, 2] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["exact_matches"].as_array().unwrap().len(), 1);
    assert_eq!(body["exact_matches"][0]["id"], 1);
    assert!(body["ranked"].is_null());

    // A different profile finds nothing.
    let response = app
        .oneshot(post(
            "/api/recommend",
            None,
            json!({ "cm_restrictions": [2, 2, 2, 2, 2, 2, 2, 2, 2] }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["exact_matches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn scoring_a_reference_record_conflicts() {
    let (app, _dir) = test_app(false);

    app.clone()
        .oneshot(post("/api/project/add", None, submission("Frozen")))
        .await
        .unwrap();
    app.clone()
        .oneshot(post("/api/project/history/1", Some("admin"), json!({})))
        .await
        .unwrap();

    let response = app
        .oneshot(post(
            "/api/project/score",
            Some("expert"),
            json!({
                "project_id": 1,
                "cm_restrictions": [0, 0, 0, 0, 0, 0, 0, 0, 0],
                "attribute_ratings": [0, 0, 0, 0, 0, 0, 0, 0, 0]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn ranked_recommendation_reports_best_software() {
    let (app, _dir) = test_app(true);

    for title in ["A", "B"] {
        app.clone()
            .oneshot(post("/api/project/add", None, submission(title)))
            .await
            .unwrap();
    }
    for id in [1, 2] {
        app.clone()
            .oneshot(post(
                &format!("/api/project/history/{id}"),
                Some("admin"),
                json!({}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(post(
            "/api/recommend",
            None,
            json!({ "cm_restrictions": [0, 0, 0, 0, 0, 0, 0, 0, 0] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // Both reference projects used Synchro Pro with untouched zero vectors,
    // so the query profile matches them exactly.
    let ranked = &body["ranked"];
    assert_eq!(ranked["scores"].as_array().unwrap().len(), 3);
    assert_eq!(ranked["scores"][0], 2.0);
    assert_eq!(ranked["recommended"]["name"], "Synchro Pro");
}

#[tokio::test]
async fn ranked_recommendation_with_empty_history_has_no_winner() {
    let (app, _dir) = test_app(true);

    let response = app
        .oneshot(post(
            "/api/recommend",
            None,
            json!({ "cm_restrictions": [0, 0, 0, 0, 0, 0, 0, 0, 0] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ranked"]["scores"], json!([0.0, 0.0, 0.0]));
    assert!(body["ranked"]["recommended"].is_null());
}
