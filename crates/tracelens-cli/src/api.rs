//! HTTP API - 説明を JSON で返す読み取り専用エンドポイント
//!
//! # ルーティング
//! - `GET /health`
//! - `GET /runs/{run_id}/explain`
//! - `GET /runs/{run_id}/steps/{step_id}/explain`
//! - `GET /decisions/{trace_id}/explain`（テナントで絞り込まない。ストア任せ）
//! - `GET /nodes/{node_id}/trajectory`
//!
//! テナントは `x-tenant-id` ヘッダーから取得し、リクエストごとに Explainer を構築する。

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use tracelens_core::app::{BuildError, ExplainOptions, Explainer};
use tracelens_core::domain::{
    DecisionExplanation, NodeId, RunExplanation, RunId, StepId, StoreError, TenantId, TraceId,
};

use crate::stores::Stores;

pub const TENANT_HEADER: &str = "x-tenant-id";

pub fn router(stores: Stores) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/runs/{run_id}/explain", get(explain_run))
        .route("/runs/{run_id}/steps/{step_id}/explain", get(explain_step))
        .route("/decisions/{trace_id}/explain", get(explain_decision))
        .route("/nodes/{node_id}/trajectory", get(trajectory))
        .layer(TraceLayer::new_for_http())
        .with_state(stores)
}

/// API のエラー
#[derive(Debug)]
pub enum ApiError {
    MissingTenant,
    BadQuery(String),
    NotFound(String),
    Store(StoreError),
    Build(BuildError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<BuildError> for ApiError {
    fn from(err: BuildError) -> Self {
        ApiError::Build(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::MissingTenant => (
                StatusCode::BAD_REQUEST,
                "missing_tenant",
                format!("the {TENANT_HEADER} header is required"),
            ),
            ApiError::BadQuery(message) => (StatusCode::BAD_REQUEST, "invalid_query", message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Store(err) => {
                error!(error = %err, "store failure while explaining");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    err.to_string(),
                )
            }
            ApiError::Build(err) => {
                error!(error = %err, "explainer construction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    err.to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

fn tenant(headers: &HeaderMap) -> Result<TenantId, ApiError> {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(TenantId::from)
        .ok_or(ApiError::MissingTenant)
}

/// クエリパラメータ（level, includeRaw, resolveEntities, maxContentLength）。
/// 未指定の項目は ExplainOptions のデフォルト。
type OptionsQuery = Result<Query<ExplainOptions>, QueryRejection>;

fn options(query: OptionsQuery) -> Result<ExplainOptions, ApiError> {
    let Query(options) = query.map_err(|e| ApiError::BadQuery(e.body_text()))?;
    Ok(options)
}

fn explainer(stores: &Stores, headers: &HeaderMap) -> Result<Explainer, ApiError> {
    let tenant_id = tenant(headers)?;
    Ok(stores.explainer(tenant_id)?)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn explain_run(
    State(stores): State<Stores>,
    Path(run_id): Path<String>,
    headers: HeaderMap,
    query: OptionsQuery,
) -> Result<Json<RunExplanation>, ApiError> {
    let explainer = explainer(&stores, &headers)?;
    let options = options(query)?;
    info!(tenant = %explainer.tenant_id(), %run_id, level = %options.level, "explain run");

    explainer
        .explain_run(&RunId::new(run_id.clone()), &options)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id} has no decisions")))
}

async fn explain_step(
    State(stores): State<Stores>,
    Path((run_id, step_id)): Path<(String, String)>,
    headers: HeaderMap,
    query: OptionsQuery,
) -> Result<Json<DecisionExplanation>, ApiError> {
    let explainer = explainer(&stores, &headers)?;
    let options = options(query)?;
    info!(tenant = %explainer.tenant_id(), %run_id, %step_id, "explain step");

    explainer
        .explain_step(&RunId::new(run_id.clone()), &StepId::new(step_id.clone()), &options)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("step {step_id} not found in run {run_id}")))
}

/// trace id だけで引く（TraceStore::get_trace はテナントを受け取らない）。
/// テナントの分離はストア側の責務で、ヘッダーは Explainer の構築とログにのみ使う。
async fn explain_decision(
    State(stores): State<Stores>,
    Path(trace_id): Path<String>,
    headers: HeaderMap,
    query: OptionsQuery,
) -> Result<Json<DecisionExplanation>, ApiError> {
    let explainer = explainer(&stores, &headers)?;
    let options = options(query)?;
    info!(tenant = %explainer.tenant_id(), %trace_id, "explain decision");

    explainer
        .explain_decision(&TraceId::new(trace_id.clone()), &options)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("decision {trace_id} not found")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryResponse {
    pub node_id: NodeId,
    pub lines: Vec<String>,
}

async fn trajectory(
    State(stores): State<Stores>,
    Path(node_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TrajectoryResponse>, ApiError> {
    let explainer = explainer(&stores, &headers)?;
    info!(tenant = %explainer.tenant_id(), %node_id, "explain trajectory");

    let node_id = NodeId::new(node_id);
    let lines = explainer.explain_trajectory(&node_id).await?;
    Ok(Json(TrajectoryResponse { node_id, lines }))
}
