//! HTTP surface of the decision-support service.
//!
//! JSON endpoints replace the original template screens; role enforcement
//! happens in the [`crate::role_policy`] middleware before any handler
//! runs.

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;
use crate::errors::{DssError, DssResult};
use crate::matcher;
use crate::project::{AttributeVector, ConstraintVector, ProjectRecord};
use crate::role_policy::role_guard;
use crate::software::SoftwareApp;
use crate::store::next_project_id;

#[derive(Debug, Deserialize)]
pub struct ProjectSubmission {
    pub email: String,
    pub title: String,
    pub involvement: String,
    pub application: SoftwareApp,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub local_authority: String,
    pub version: String,
    pub date_of_project: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: u32,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub project_id: u32,
    pub cm_restrictions: ConstraintVector,
    pub attribute_ratings: AttributeVector,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub cm_restrictions: ConstraintVector,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    /// Historical projects whose constraint profile equals the query.
    pub exact_matches: Vec<ProjectRecord>,
    /// Present only when ranked recommendation is enabled in config.
    pub ranked: Option<RankedRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct RankedRecommendation {
    /// Aggregate similarity support per application, accumulator order.
    pub scores: Vec<f64>,
    pub recommended: Option<RecommendedSoftware>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedSoftware {
    pub application: SoftwareApp,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Build the full application router with role enforcement and CORS.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/project/add", post(add_project))
        .route("/api/project/list", get(list_projects))
        .route("/api/project/mine/{email}", get(my_projects))
        .route("/api/project/get/{id}", get(get_project))
        .route("/api/project/score", post(score_project))
        .route("/api/project/accept/{id}", post(accept_project))
        .route("/api/project/history/{id}", post(add_history))
        .route("/api/project/unhistory/{id}", post(remove_history))
        .route("/api/project/delete/{id}", post(delete_project))
        .route("/api/recommend", post(recommend))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(middleware::from_fn(role_guard))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn add_project(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ProjectSubmission>,
) -> DssResult<Json<SubmitResponse>> {
    if !req.email.contains('@') {
        return Err(DssError::invalid_input("email", "not a valid address"));
    }
    if req.title.trim().is_empty() {
        return Err(DssError::invalid_input("title", "must not be empty"));
    }

    let mut records = st.load_records()?;
    let id = next_project_id(&records);
    records.push(ProjectRecord {
        id,
        email: req.email,
        title: req.title,
        involvement: req.involvement,
        application: req.application,
        country: req.country,
        city: req.city,
        local_authority: req.local_authority,
        version: req.version,
        date_of_project: req.date_of_project,
        accepted: false,
        history: false,
        cm_restrictions: ConstraintVector::zeroed(),
        attribute_ratings: AttributeVector::zeroed(),
        images: vec![],
        files: vec![],
    });
    st.save_records(&records)?;

    // Submission notifications go out through an external mailer; this
    // event is the hook it subscribes to.
    tracing::info!(project_id = id, "project submitted");
    Ok(Json(SubmitResponse { id }))
}

async fn list_projects(State(st): State<Arc<AppState>>) -> DssResult<Json<Vec<ProjectRecord>>> {
    Ok(Json(st.load_records()?))
}

/// Accepted projects belonging to one Expert, the scoring worklist.
async fn my_projects(
    State(st): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> DssResult<Json<Vec<ProjectRecord>>> {
    let records = st.load_records()?;
    Ok(Json(
        records
            .into_iter()
            .filter(|r| r.accepted && r.email == email)
            .collect(),
    ))
}

async fn get_project(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> DssResult<Json<ProjectRecord>> {
    let records = st.load_records()?;
    records
        .into_iter()
        .find(|r| r.id == id)
        .map(Json)
        .ok_or_else(|| DssError::not_found("project", id.to_string()))
}

async fn score_project(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> DssResult<Json<ProjectRecord>> {
    let mut records = st.load_records()?;
    let record = records
        .iter_mut()
        .find(|r| r.id == req.project_id)
        .ok_or_else(|| DssError::not_found("project", req.project_id.to_string()))?;

    if record.history {
        return Err(DssError::conflict(
            "historical reference records are read-only",
        ));
    }

    record.cm_restrictions = req.cm_restrictions;
    record.attribute_ratings = req.attribute_ratings;
    let updated = record.clone();
    st.save_records(&records)?;

    tracing::info!(project_id = updated.id, "project scored");
    Ok(Json(updated))
}

async fn accept_project(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> DssResult<Json<StatusResponse>> {
    set_flags(&st, id, |r| r.accepted = true)?;
    Ok(Json(ok_status()))
}

async fn add_history(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> DssResult<Json<StatusResponse>> {
    set_flags(&st, id, |r| r.history = true)?;
    Ok(Json(ok_status()))
}

async fn remove_history(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> DssResult<Json<StatusResponse>> {
    set_flags(&st, id, |r| r.history = false)?;
    Ok(Json(ok_status()))
}

async fn delete_project(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> DssResult<Json<StatusResponse>> {
    let mut records = st.load_records()?;
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        return Err(DssError::not_found("project", id.to_string()));
    }
    st.save_records(&records)?;
    tracing::info!(project_id = id, "project deleted");
    Ok(Json(ok_status()))
}

async fn recommend(
    State(st): State<Arc<AppState>>,
    Json(req): Json<RecommendRequest>,
) -> DssResult<Json<RecommendResponse>> {
    let records = st.load_records()?;
    let history: Vec<ProjectRecord> = records.into_iter().filter(|r| r.is_reference()).collect();
    let query = req.cm_restrictions;

    let exact_matches: Vec<ProjectRecord> = matcher::exact_constraint_match(query.as_slice(), &history)
        .into_iter()
        .cloned()
        .collect();

    let ranked = if st.ranked_recommendation {
        let scores = matcher::software_scores(query.as_slice(), &history, st.neighbour_threshold)?;
        let recommended = if history.is_empty() {
            // All-zero scores carry no signal without neighbours.
            None
        } else {
            matcher::max_score(&scores).map(|(index, score)| {
                let application = SoftwareApp::ALL[index];
                RecommendedSoftware {
                    application,
                    name: application.name().to_string(),
                    score,
                }
            })
        };
        Some(RankedRecommendation {
            scores: scores.to_vec(),
            recommended,
        })
    } else {
        None
    };

    Ok(Json(RecommendResponse {
        exact_matches,
        ranked,
    }))
}

async fn healthz() -> Json<StatusResponse> {
    Json(ok_status())
}

async fn readyz(State(st): State<Arc<AppState>>) -> DssResult<Json<StatusResponse>> {
    // Ready once the store is reachable.
    st.load_records()?;
    Ok(Json(ok_status()))
}

fn ok_status() -> StatusResponse {
    StatusResponse {
        status: "ok".to_string(),
    }
}

fn set_flags(
    st: &AppState,
    id: u32,
    apply: impl FnOnce(&mut ProjectRecord),
) -> DssResult<()> {
    let mut records = st.load_records()?;
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| DssError::not_found("project", id.to_string()))?;
    apply(record);
    let updated_id = record.id;
    st.save_records(&records)?;
    tracing::info!(project_id = updated_id, "project workflow flags updated");
    Ok(())
}
