use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::domain::{ApplicantStatus, CheckId, CheckRecord, CheckSummary};
use super::repository::CheckRepository;
use super::service::{AffordabilityCheckService, CheckServiceError};
use crate::error::AppError;
use crate::workflows::affordability::{Account, Transaction};

#[derive(Debug, Deserialize)]
pub struct OpenCheckRequest {
    pub applicant_name: String,
}

/// Bank data gathered for a check. `now` defaults to the local date.
#[derive(Debug, Deserialize)]
pub struct CheckDataRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default, deserialize_with = "deserialize_evaluation_date")]
    pub now: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListChecksQuery {
    #[serde(default)]
    pub status: Option<ApplicantStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CheckFailureRequest {
    #[serde(default)]
    pub reason: String,
}

/// HTTP endpoints for opening, feeding and inspecting affordability checks.
pub fn check_router<R>(service: Arc<AffordabilityCheckService<R>>) -> Router
where
    R: CheckRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/checks",
            get(list_handler::<R>).post(open_handler::<R>),
        )
        .route("/api/v1/checks/:check_id", get(status_handler::<R>))
        .route("/api/v1/checks/:check_id/start", post(start_handler::<R>))
        .route("/api/v1/checks/:check_id/data", post(data_handler::<R>))
        .route("/api/v1/checks/:check_id/failure", post(failure_handler::<R>))
        .with_state(service)
}

pub(crate) async fn open_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Json(request): Json<OpenCheckRequest>,
) -> Response
where
    R: CheckRepository + 'static,
{
    respond(service.open(&request.applicant_name), StatusCode::CREATED)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Query(query): Query<ListChecksQuery>,
) -> Response
where
    R: CheckRepository + 'static,
{
    match service.list(query.status) {
        Ok(records) => {
            let summaries: Vec<CheckSummary> = records.iter().map(CheckRecord::summary).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Path(check_id): Path<String>,
) -> Response
where
    R: CheckRepository + 'static,
{
    respond(service.get(&CheckId(check_id)), StatusCode::OK)
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Path(check_id): Path<String>,
) -> Response
where
    R: CheckRepository + 'static,
{
    respond(service.begin(&CheckId(check_id)), StatusCode::OK)
}

pub(crate) async fn data_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Path(check_id): Path<String>,
    Json(request): Json<CheckDataRequest>,
) -> Response
where
    R: CheckRepository + 'static,
{
    let now = request.now.unwrap_or_else(|| Local::now().date_naive());
    let result = service.complete(
        &CheckId(check_id),
        &request.transactions,
        &request.accounts,
        now,
    );
    respond(result, StatusCode::OK)
}

pub(crate) async fn failure_handler<R>(
    State(service): State<Arc<AffordabilityCheckService<R>>>,
    Path(check_id): Path<String>,
    Json(request): Json<CheckFailureRequest>,
) -> Response
where
    R: CheckRepository + 'static,
{
    respond(
        service.fail(&CheckId(check_id), &request.reason),
        StatusCode::OK,
    )
}

fn respond(
    result: Result<CheckRecord, CheckServiceError>,
    success: StatusCode,
) -> Response {
    match result {
        Ok(record) => (success, Json(record.status_view())).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

/// Parse an evaluation date given as `YYYY-MM-DD`.
pub fn parse_evaluation_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Serde hook for optional `now` fields in request bodies.
pub fn deserialize_evaluation_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|value| parse_evaluation_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
