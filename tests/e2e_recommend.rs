// End-to-end: records persisted through a store feed the matcher and the
// recommendation endpoint the same way the handlers wire them together.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use bim_dss::app_state::AppState;
use bim_dss::config::DssConfig;
use bim_dss::project::{AttributeVector, ConstraintVector, ProjectRecord};
use bim_dss::store::ProjectStore;
use bim_dss::store_sled::SledProjectStore;
use bim_dss::web::build_router;
use bim_dss::{exact_constraint_match, max_score, nearest_neighbours, software_scores, SoftwareApp};

fn reference_record(id: u32, constraints: [u8; 9], app: SoftwareApp) -> ProjectRecord {
    ProjectRecord {
        id,
        email: "expert@example.com".into(),
        title: format!("Reference {id}"),
        involvement: "4D planner".into(),
        application: app,
        country: "Ireland".into(),
        city: "Galway".into(),
        local_authority: String::new(),
        version: "1".into(),
        date_of_project: NaiveDate::from_ymd_opt(2017, 9, 1).unwrap(),
        accepted: true,
        history: true,
        cm_restrictions: ConstraintVector::new(constraints).unwrap(),
        attribute_ratings: AttributeVector::zeroed(),
        images: vec![],
        files: vec![],
    }
}

#[test]
fn matcher_over_persisted_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledProjectStore::open(dir.path()).unwrap();

    let records = vec![
        reference_record(1, [0, 1, 2, 0, 1, 2, 0, 1, 2], SoftwareApp::SynchroPro),
        reference_record(2, [2, 1, 0, 2, 1, 0, 2, 1, 0], SoftwareApp::AstaPowerProject),
        reference_record(3, [0, 1, 2, 0, 1, 2, 0, 1, 2], SoftwareApp::NavisworksManage),
    ];
    store.save(&records).unwrap();

    let history = store.load().unwrap();
    let query = [0, 1, 2, 0, 1, 2, 0, 1, 2];

    let exact = exact_constraint_match(&query, &history);
    assert_eq!(exact.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);

    let top = nearest_neighbours(&query, &history, 2).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].record.id, 1);
    assert_eq!(top[0].score, 1.0);
    assert_eq!(top[1].record.id, 3);

    let scores = software_scores(&query, &history, 5).unwrap();
    // Identical profiles contribute 1.0 each; the reversed profile sums
    // (-1 + 1 - 1) per triplet, -3/9 overall.
    assert_eq!(scores, [1.0, -1.0 / 3.0, 1.0]);
    // Slots 0 and 2 tie at 1.0; the first occurrence wins.
    assert_eq!(max_score(&scores), Some((0, 1.0)));
}

#[tokio::test]
async fn recommendation_endpoint_over_sled_backend() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledProjectStore::open(dir.path()).unwrap();
    store
        .save(&[reference_record(
            1,
            [1, 1, 1, 1, 1, 1, 1, 1, 1],
            SoftwareApp::NavisworksManage,
        )])
        .unwrap();

    let config = DssConfig {
        ranked_recommendation: true,
        ..DssConfig::default()
    };
    let state = Arc::new(AppState::new(Box::new(store), &config));
    let app = build_router(state);

    let request = Request::builder()
        .uri("/api/recommend")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({ "cm_restrictions": [1, 1, 1, 1, 1, 1, 1, 1, 1] }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["exact_matches"][0]["id"], 1);
    assert_eq!(body["ranked"]["recommended"]["name"], "Navisworks Manage");
    assert_eq!(body["ranked"]["scores"][2], 1.0);
}
