//! API Handlers
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sora_core::{Assessment, EvaluationContext, OperationSnapshot, OsoEntry, ENGINE_VERSION};
use sora_engine::{assess_with_context, TABLES_EDITION};
use sora_export::StudyMeta;
use sora_store::{FileCategory, FileMetadata, FileUpload, StoreError, StudyRecord, StudySummary};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::middleware::Caller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub snapshot: OperationSnapshot,
    /// OSO entries from an earlier evaluation whose evidence should carry over
    #[serde(default)]
    pub prior_evidence: Vec<OsoEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudyRequest {
    pub name: String,
    pub snapshot: OperationSnapshot,
    #[serde(default)]
    pub prior_evidence: Vec<OsoEntry>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudyRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub snapshot: OperationSnapshot,
    /// Replaces the stored evidence when present
    #[serde(default)]
    pub evidence: Option<Vec<OsoEntry>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DossierQuery {
    pub operator: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub url: String,
}

fn run_assessment(
    state: &AppState,
    snapshot: &OperationSnapshot,
    prior: &[OsoEntry],
    ctx: &EvaluationContext,
) -> Result<Assessment, ApiError> {
    match assess_with_context(snapshot, prior, &state.config, ctx) {
        Ok(assessment) => {
            state.metrics.record_assessment("ok");
            Ok(assessment)
        }
        Err(e) => {
            state.metrics.record_assessment(e.code());
            Err(e.into())
        }
    }
}

fn tally<T>(state: &AppState, operation: &str, result: Result<T, StoreError>) -> Result<T, ApiError> {
    state.metrics.record_study(operation, result.is_ok());
    Ok(result?)
}

fn to_document(assessment: &Assessment) -> Result<Value, ApiError> {
    serde_json::to_value(assessment).map_err(|e| ApiError::Store(StoreError::Serialize(e.to_string())))
}

pub async fn create_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<Assessment>, ApiError> {
    let ctx = EvaluationContext::new(TABLES_EDITION);
    let assessment = run_assessment(&state, &request.snapshot, &request.prior_evidence, &ctx)?;
    Ok(Json(assessment))
}

pub async fn create_study(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Json(request): Json<CreateStudyRequest>,
) -> Result<(StatusCode, Json<StudyRecord>), ApiError> {
    let ctx = EvaluationContext::new(TABLES_EDITION);
    let assessment = run_assessment(&state, &request.snapshot, &request.prior_evidence, &ctx)?;
    let record = tally(
        &state,
        "create",
        state.studies.create(&principal, &request.name, to_document(&assessment)?),
    )?;

    info!(study_id = %record.id, owner = %record.owner, sail = %assessment.sail, "study created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_studies(
    State(state): State<AppState>,
    Caller(principal): Caller,
) -> Result<Json<Vec<StudySummary>>, ApiError> {
    let studies = tally(&state, "list", state.studies.list(&principal))?;
    Ok(Json(studies))
}

pub async fn get_study(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
) -> Result<Json<StudyRecord>, ApiError> {
    let record = tally(&state, "get", state.studies.get(&principal, &id))?;
    Ok(Json(record))
}

/// Re-evaluate a study from an edited snapshot, keeping its OSO evidence
pub async fn update_study(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
    Json(request): Json<UpdateStudyRequest>,
) -> Result<Json<StudyRecord>, ApiError> {
    let existing = tally(&state, "get", state.studies.get(&principal, &id))?;

    let prior = match request.evidence {
        Some(evidence) => evidence,
        None => match existing.assessment() {
            Ok(previous) => previous.osos,
            Err(e) => {
                warn!(study_id = %id, error = %e, "stored document is not an assessment, evidence not carried over");
                Vec::new()
            }
        },
    };

    let ctx = EvaluationContext::new(TABLES_EDITION).for_study(id.clone());
    let assessment = run_assessment(&state, &request.snapshot, &prior, &ctx)?;
    let record = tally(
        &state,
        "update",
        state
            .studies
            .update(&principal, &id, request.name.as_deref(), to_document(&assessment)?),
    )?;
    Ok(Json(record))
}

pub async fn delete_study(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tally(&state, "delete", state.studies.delete(&principal, &id))?;

    // The record is gone either way; orphaned files are only logged
    match state.files.delete_study_files(&id) {
        Ok(removed) => info!(study_id = %id, removed, "study deleted"),
        Err(e) => warn!(study_id = %id, error = %e, "study deleted but its files were not removed"),
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn study_dossier(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
    Query(query): Query<DossierQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let record = tally(&state, "get", state.studies.get(&principal, &id))?;
    let assessment = record.assessment()?;

    let mut meta = StudyMeta::new(record.name.clone());
    meta.operator = query.operator;
    meta.author = query.author.or(Some(record.owner.clone()));

    let rendered = state.exporter.render(&assessment, &meta);
    state.metrics.record_dossier(rendered.is_ok());
    let markdown = rendered?;

    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], markdown))
}

/// Store a file under a study; the body is the raw file content
pub async fn upload_study_file(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path((id, category)): Path<(String, FileCategory)>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<FileMetadata>), ApiError> {
    tally(&state, "get", state.studies.get(&principal, &id))?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let metadata = state
        .files
        .upload(&id, category, FileUpload::new(query.name, content_type, body.to_vec()))?;

    info!(study_id = %id, %category, file = %metadata.name, size = metadata.size, "study file uploaded");
    Ok((StatusCode::CREATED, Json(metadata)))
}

/// Delete one file of a study by its public URL
pub async fn delete_study_file(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
    Query(query): Query<FileQuery>,
) -> Result<StatusCode, ApiError> {
    tally(&state, "get", state.studies.get(&principal, &id))?;

    let path = state.files.path_of(&query.url)?;
    if !path.starts_with(&format!("{}/", id)) {
        warn!(study_id = %id, path = %path, "file delete outside the study rejected");
        return Err(StoreError::Forbidden(format!("{} is not a file of study {}", query.url, id)).into());
    }

    state.files.delete(&query.url)?;
    info!(study_id = %id, path = %path, "study file deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": ENGINE_VERSION,
            "tables_edition": TABLES_EDITION,
            "config": state.config.name,
            "time": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match crate::metrics::encode(state.metrics.registry()) {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            e.to_string(),
        ),
    }
}
