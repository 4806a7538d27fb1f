use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tenant_affordability::error::AppError;
use tenant_affordability::workflows::affordability::composite::score_from_report;
use tenant_affordability::workflows::affordability::{
    Account, AffordabilityReport, Transaction,
};
use tenant_affordability::workflows::checks::router::deserialize_evaluation_date;
use tenant_affordability::workflows::checks::{
    check_router, AffordabilityCheckService, CheckRepository,
};

#[derive(Debug, Deserialize)]
pub(crate) struct AffordabilityReportRequest {
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
    #[serde(default)]
    pub(crate) accounts: Vec<Account>,
    #[serde(default, deserialize_with = "deserialize_evaluation_date")]
    pub(crate) now: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_composite: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AffordabilityReportResponse {
    pub(crate) now: NaiveDate,
    pub(crate) report: AffordabilityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) composite_score: Option<f64>,
}

pub(crate) fn with_check_routes<R>(service: Arc<AffordabilityCheckService<R>>) -> axum::Router
where
    R: CheckRepository + 'static,
{
    check_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/affordability/report",
            axum::routing::post(affordability_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless scoring: nothing about the request is stored.
pub(crate) async fn affordability_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AffordabilityReportRequest>,
) -> Result<Json<AffordabilityReportResponse>, AppError> {
    let AffordabilityReportRequest {
        transactions,
        accounts,
        now,
        include_composite,
    } = payload;

    let now = now.unwrap_or_else(|| Local::now().date_naive());
    let report = state.engine.compute(&transactions, &accounts, now);
    let composite_score = include_composite.then(|| score_from_report(&report));

    Ok(Json(AffordabilityReportResponse {
        now,
        report,
        composite_score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryCheckRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tenant_affordability::workflows::affordability::AffordabilityEngine;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            engine: Arc::new(AffordabilityEngine::default()),
        }
    }

    fn salary(month: u32) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2025, month, 1).expect("valid date");
        Transaction::new(date, "ACME PAYROLL", 2000.0)
    }

    fn app(ready: bool) -> axum::Router {
        let engine = Arc::new(AffordabilityEngine::default());
        let service = Arc::new(AffordabilityCheckService::new(
            Arc::new(InMemoryCheckRepository::default()),
            engine,
        ));
        with_check_routes(service).layer(Extension(state(ready)))
    }

    #[tokio::test]
    async fn report_endpoint_scores_the_payload() {
        let request = AffordabilityReportRequest {
            transactions: vec![salary(3), salary(4), salary(5)],
            accounts: Vec::new(),
            now: NaiveDate::from_ymd_opt(2025, 6, 15),
            include_composite: false,
        };

        let Json(body) = affordability_report_endpoint(Extension(state(true)), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.report.average_monthly_income, 2994.1);
        assert_eq!(body.report.income_stability_score, 96.97);
        assert!(body.composite_score.is_none());
    }

    #[tokio::test]
    async fn report_endpoint_can_include_composite_score() {
        let request = AffordabilityReportRequest {
            transactions: vec![salary(3), salary(4), salary(5)],
            accounts: Vec::new(),
            now: NaiveDate::from_ymd_opt(2025, 6, 15),
            include_composite: true,
        };

        let Json(body) = affordability_report_endpoint(Extension(state(true)), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.composite_score, Some(10.0));
    }

    #[tokio::test]
    async fn report_route_accepts_json_payloads() {
        let payload = json!({
            "transactions": [
                { "made_on": "2025-05-02", "description": "Superbet", "amount": -40 }
            ],
            "now": "2025-06-15",
        });

        let response = app(true)
            .oneshot(
                Request::post("/api/v1/affordability/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(body["now"], "2025-06-15");
        assert_eq!(body["report"]["flags"][0]["type"], "HIGH_GAMBLING_SPEND");
        assert!(body.get("composite_score").is_none());
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_dates_are_rejected_alike_on_both_endpoints() {
        let router = app(true);
        let post = |uri: &str, payload: serde_json::Value| {
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds")
        };

        let opened = router
            .clone()
            .oneshot(post("/api/v1/checks", json!({ "applicant_name": "Ana Popescu" })))
            .await
            .expect("route executes");
        assert_eq!(opened.status(), StatusCode::CREATED);

        for uri in ["/api/v1/affordability/report", "/api/v1/checks/chk-000001/data"] {
            let response = router
                .clone()
                .oneshot(post(uri, json!({ "transactions": [], "now": "15/06/2025" })))
                .await
                .expect("route executes");
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
                .await
                .expect("read body");
            let message = String::from_utf8_lossy(&body);
            assert!(message.contains("as YYYY-MM-DD"), "{uri}: {message}");
        }
    }

    #[tokio::test]
    async fn check_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/checks/chk-000404")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
