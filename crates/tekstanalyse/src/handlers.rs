use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use korpus_analyze::{Analysis, OccurrenceKind, analyze, export_missing, export_resolved};
use korpus_db::ReferenceTables;
use korpus_types::{AnnotationRecord, CaseVariant, ReferenceLookup};

#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<ReferenceTables>,
    pub max_text_len: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/analyze", post(analyze_text))
        .route("/v1/analyze/resolved", post(analyze_resolved))
        .route("/v1/analyze/missing", post(analyze_missing))
        .route("/v1/lookup", get(lookup))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub word: String,
}

#[derive(Serialize)]
struct RecordDto {
    lemma: String,
    inflected_form: String,
    part_of_speech: &'static str,
    relative_frequency: f64,
}

impl RecordDto {
    fn from_record(record: &AnnotationRecord) -> Self {
        Self {
            lemma: record.lemma.clone(),
            inflected_form: record.inflected_form.clone(),
            part_of_speech: record.part_of_speech.as_str(),
            relative_frequency: record.relative_frequency,
        }
    }
}

#[derive(Serialize)]
struct OccurrenceDto {
    position: usize,
    surface_form: String,
    status: &'static str,
    candidates: Vec<RecordDto>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    token_count: usize,
    lix: Option<u32>,
    resolved: Vec<RecordDto>,
    missing: Vec<String>,
    occurrences: Vec<OccurrenceDto>,
}

#[derive(Serialize)]
struct LexiconRowDto {
    lemma: String,
    inflected_form: String,
    part_of_speech: &'static str,
}

#[derive(Serialize)]
struct CorpusRowDto {
    lemma: String,
    part_of_speech: &'static str,
    relative_frequency: f64,
    case_variant: &'static str,
}

#[derive(Serialize)]
struct LookupResponse {
    word: String,
    lexicon: Vec<LexiconRowDto>,
    corpus: Vec<CorpusRowDto>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

fn run_analysis(state: &AppState, text: &str) -> Result<Analysis, ApiError> {
    if text.len() > state.max_text_len {
        return Err(ApiError::bad_request(format!(
            "text exceeds the {} byte limit",
            state.max_text_len
        )));
    }
    let analysis = analyze(text, state.tables.as_ref());
    if analysis.token_count == 0 {
        warn!("analysis request produced no tokens");
    }
    Ok(analysis)
}

async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let analysis = run_analysis(&state, &request.text)?;
    let reconciled = &analysis.reconciled;

    let occurrences = reconciled
        .occurrences()
        .iter()
        .map(|occurrence| OccurrenceDto {
            position: occurrence.position,
            surface_form: occurrence.surface_form.clone(),
            status: match occurrence.kind {
                OccurrenceKind::Resolved => "resolved",
                OccurrenceKind::CorpusOnly => "corpus_only",
                OccurrenceKind::Missing => "missing",
            },
            candidates: reconciled
                .candidates_for(&occurrence.surface_form)
                .iter()
                .map(RecordDto::from_record)
                .collect(),
        })
        .collect();

    Ok(Json(AnalyzeResponse {
        token_count: analysis.token_count,
        lix: analysis.lix,
        resolved: reconciled
            .resolved_records()
            .iter()
            .map(RecordDto::from_record)
            .collect(),
        missing: reconciled.missing_words().iter().cloned().collect(),
        occurrences,
    }))
}

async fn analyze_resolved(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    let analysis = run_analysis(&state, &request.text)?;
    let body = export_resolved(analysis.reconciled.resolved_records());
    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/tab-separated-values; charset=utf-8"),
        )],
        body,
    )
        .into_response())
}

async fn analyze_missing(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    let analysis = run_analysis(&state, &request.text)?;
    let body = export_missing(analysis.reconciled.missing_words());
    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        body,
    )
        .into_response())
}

async fn lookup(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let word = query.word.trim().to_lowercase();
    if word.is_empty() {
        return Err(ApiError::bad_request("word is required"));
    }

    let lexicon = state
        .tables
        .lookup_by_inflected_form(&word)
        .iter()
        .map(|entry| LexiconRowDto {
            lemma: entry.lemma.clone(),
            inflected_form: entry.inflected_form.clone(),
            part_of_speech: entry.part_of_speech.as_str(),
        })
        .collect();

    let mut corpus = Vec::new();
    for (case, label) in [
        (CaseVariant::Exact, "exact"),
        (CaseVariant::Capitalized, "capitalized"),
    ] {
        for row in state.tables.lookup_by_lemma(&word, case) {
            corpus.push(CorpusRowDto {
                lemma: row.lemma.clone(),
                part_of_speech: row.part_of_speech.as_str(),
                relative_frequency: row.relative_frequency,
                case_variant: label,
            });
        }
    }

    Ok(Json(LookupResponse {
        word,
        lexicon,
        corpus,
    }))
}
