// HTTP route handlers for the testsmith API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, Language, RunStatus};
use testsmith_engine::resolver::{self, Candidate, EntryPoint};
use testsmith_engine::{extract, synthesize_judge_harness, synthesize_test_harness};
use testsmith_runner::RunRequest;
use tracing::{error, info, warn};

use crate::metrics;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    pub language: Language,
    pub entry_point: EntryPoint,
    pub program: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeHarnessRequest {
    pub language: Language,
    pub source: String,
    pub input_schema: Vec<InputSchemaEntry>,
    #[serde(default)]
    pub entry_name: Option<String>,
    #[serde(default)]
    pub options: Option<ExecutionOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub language: Language,
    pub source: String,
    #[serde(default)]
    pub input_schema: Vec<InputSchemaEntry>,
    #[serde(default)]
    pub entry_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub entry: EntryPoint,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub output: String,
}

fn error_body(message: impl ToString) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message.to_string() }))
}

/// GET /status - Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "languages": state.executor.catalog().list_languages(),
            "time": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /synthesize - Build the full test harness
pub async fn synthesize(Json(payload): Json<RunRequest>) -> impl IntoResponse {
    let entry_point = resolver::resolve(
        &payload.source,
        payload.language,
        &payload.input_schema,
        payload.entry_name.as_deref(),
    );
    let program = synthesize_test_harness(
        &payload.source,
        payload.language,
        &payload.test_cases,
        &payload.input_schema,
        payload.entry_name.as_deref(),
        payload.options.as_ref(),
    );
    metrics::SYNTHESIS_TOTAL
        .with_label_values(&[payload.language.to_string().as_str()])
        .inc();
    info!(
        language = %payload.language,
        entry = %entry_point.name,
        test_cases = payload.test_cases.len(),
        "Harness synthesized"
    );

    (
        StatusCode::OK,
        Json(ProgramResponse {
            language: payload.language,
            entry_point,
            program,
        }),
    )
}

/// POST /synthesize/judge - Build the stdin-driven single-call program
pub async fn synthesize_judge(Json(payload): Json<JudgeHarnessRequest>) -> impl IntoResponse {
    let entry_point = resolver::resolve(
        &payload.source,
        payload.language,
        &payload.input_schema,
        payload.entry_name.as_deref(),
    );
    let program = synthesize_judge_harness(
        &payload.source,
        payload.language,
        &payload.input_schema,
        payload.entry_name.as_deref(),
        payload.options.as_ref(),
    );
    metrics::SYNTHESIS_TOTAL
        .with_label_values(&[payload.language.to_string().as_str()])
        .inc();

    (
        StatusCode::OK,
        Json(ProgramResponse {
            language: payload.language,
            entry_point,
            program,
        }),
    )
}

/// POST /run - Synthesize, submit to the judge and aggregate verdicts
pub async fn run(State(state): State<Arc<AppState>>, Json(payload): Json<RunRequest>) -> impl IntoResponse {
    metrics::SYNTHESIS_TOTAL
        .with_label_values(&[payload.language.to_string().as_str()])
        .inc();
    let started = Instant::now();
    let result = state.executor.run(&payload).await;
    metrics::JUDGE_SECONDS.observe(started.elapsed().as_secs_f64());

    match result {
        Ok(report) => {
            let status = match report.status {
                RunStatus::Passed => "passed",
                RunStatus::Failed => "failed",
                RunStatus::Errored => "errored",
            };
            metrics::RUNS_TOTAL.with_label_values(&[status]).inc();
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => {
            metrics::RUNS_TOTAL.with_label_values(&["judge_error"]).inc();
            error!(language = %payload.language, error = %format!("{:#}", e), "Run failed");
            (StatusCode::BAD_GATEWAY, error_body(format!("{:#}", e))).into_response()
        }
    }
}

/// POST /extract - Recover verdicts from raw program output
pub async fn extract_results(Json(payload): Json<ExtractRequest>) -> impl IntoResponse {
    match extract(&payload.output) {
        Ok(results) => (StatusCode::OK, Json(serde_json::json!({ "results": results }))).into_response(),
        Err(e) => {
            warn!(bytes = payload.output.len(), "Extraction found nothing");
            (StatusCode::UNPROCESSABLE_ENTITY, error_body(e)).into_response()
        }
    }
}

/// POST /resolve - Show which function a harness would call
pub async fn resolve(Json(payload): Json<ResolveRequest>) -> impl IntoResponse {
    let entry = resolver::resolve(
        &payload.source,
        payload.language,
        &payload.input_schema,
        payload.entry_name.as_deref(),
    );
    let candidates = resolver::find_candidates(&payload.source, payload.language);
    (StatusCode::OK, Json(ResolveResponse { entry, candidates }))
}
