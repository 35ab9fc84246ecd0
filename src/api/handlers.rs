//! HTTP request handlers for the punch reconciliation API.
//!
//! This module contains the handler functions for all punch and report
//! endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Local;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{PunchKind, PunchOutcome};
use crate::report;

use super::request::{
    ClockPunchRequest, CorrectPunchRequest, CreatePunchRequest, DayQuery, EmployeePeriodQuery,
    UnitPeriodQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/punches", post(create_punch).get(list_employee_month))
        .route("/punches/clock", post(clock_punch))
        .route("/punches/unit", get(list_unit_month))
        .route("/punches/unit/:unit_id/day", get(list_unit_day))
        .route("/punches/:id", put(correct_punch).delete(delete_punch))
        .route("/reports/monthly", get(monthly_report))
        .route("/reports/unit", get(unit_report))
        .with_state(state)
}

/// Converts a JSON extraction rejection into an API error body.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Converts an engine error into an HTTP response, logging it first.
///
/// Internal errors are logged in full here; the caller only sees the
/// generic message produced by the response mapping.
fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    if matches!(err, EngineError::Storage { .. }) {
        error!(correlation_id = %correlation_id, error = %err, "Internal failure");
    } else {
        warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
    }
    let response: ApiErrorResponse = err.into();
    (
        response.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response.error),
    )
        .into_response()
}

/// New entries and combined records are 201; exits complete existing work
/// and duplicates return stored state, both 200.
fn outcome_status(outcome: &PunchOutcome) -> StatusCode {
    match outcome.kind {
        PunchKind::Entry | PunchKind::Combined => StatusCode::CREATED,
        PunchKind::Exit | PunchKind::Duplicate => StatusCode::OK,
    }
}

/// Handler for `POST /punches`.
async fn create_punch(
    State(state): State<AppState>,
    payload: Result<Json<CreatePunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        unit_id = request.unit_id,
        "Processing punch event"
    );

    match state.engine().record(request.into()) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                record_id = outcome.record.id,
                kind = ?outcome.kind,
                "Punch recorded"
            );
            (outcome_status(&outcome), Json(outcome)).into_response()
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `POST /punches/clock` (auto-direction kiosk flow).
async fn clock_punch(
    State(state): State<AppState>,
    payload: Result<Json<ClockPunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        unit_id = request.unit_id,
        "Processing clock punch"
    );

    match state
        .engine()
        .clock(request.employee_id, request.unit_id, request.at, request.biometric_ref)
    {
        Ok(outcome) => (outcome_status(&outcome), Json(outcome)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `PUT /punches/{id}`.
async fn correct_punch(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<CorrectPunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    match state
        .engine()
        .correct(id, &request.entry_time, &request.exit_time)
    {
        Ok(record) => {
            info!(correlation_id = %correlation_id, record_id = id, "Punch corrected");
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `DELETE /punches/{id}`.
async fn delete_punch(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.engine().remove(id) {
        Ok(()) => {
            info!(correlation_id = %correlation_id, record_id = id, "Punch deleted");
            (StatusCode::OK, Json(json!({ "message": "Punch record deleted" }))).into_response()
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /punches?employee_id&month&year`.
async fn list_employee_month(
    State(state): State<AppState>,
    Query(query): Query<EmployeePeriodQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine();

    match report::employee_month_rows(
        engine.store().as_ref(),
        engine.directory().as_ref(),
        query.employee_id,
        query.month,
        query.year,
    ) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /punches/unit?unit_id&month&year`.
async fn list_unit_month(
    State(state): State<AppState>,
    Query(query): Query<UnitPeriodQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine();

    match report::unit_month_rows(
        engine.store().as_ref(),
        engine.directory().as_ref(),
        query.unit_id,
        query.month,
        query.year,
    ) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /punches/unit/{unit_id}/day?date`.
async fn list_unit_day(
    State(state): State<AppState>,
    Path(unit_id): Path<u64>,
    Query(query): Query<DayQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine();
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());

    match report::unit_day_rows(
        engine.store().as_ref(),
        engine.directory().as_ref(),
        unit_id,
        date,
    ) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /reports/monthly?employee_id&month&year`.
async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<EmployeePeriodQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine();

    match report::monthly_report(
        engine.store().as_ref(),
        engine.directory().as_ref(),
        state.calendar(),
        query.employee_id,
        query.month,
        query.year,
    ) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /reports/unit?unit_id&month&year`.
async fn unit_report(
    State(state): State<AppState>,
    Query(query): Query<UnitPeriodQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let engine = state.engine();

    match report::unit_report(
        engine.store().as_ref(),
        engine.directory().as_ref(),
        state.calendar(),
        query.unit_id,
        query.month,
        query.year,
    ) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleBook;
    use crate::ledger::{MemoryDirectory, MemoryStore};
    use crate::models::{Employee, ShiftType, Unit};
    use crate::reconcile::PunchEngine;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_state() -> AppState {
        let schedules = ScheduleBook::load("./config/default").expect("Failed to load config");
        let directory = MemoryDirectory::new();
        directory
            .upsert_unit(Unit {
                id: 1,
                name: "Central Health Post".to_string(),
            })
            .unwrap();
        directory
            .upsert_employee(Employee {
                id: 1,
                name: "Maria Souza".to_string(),
                registration: "20250011".to_string(),
                unit_id: 1,
                shift_type: ShiftType::EightHour,
                admission_date: make_date("2021-03-15"),
                active: true,
            })
            .unwrap();
        directory
            .upsert_employee(Employee {
                id: 2,
                name: "Jose Santos".to_string(),
                registration: "20250042".to_string(),
                unit_id: 1,
                shift_type: ShiftType::TwentyFourBySeventyTwo,
                admission_date: make_date("2020-02-01"),
                active: true,
            })
            .unwrap();

        let engine = PunchEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(directory),
            Arc::new(schedules),
        );
        AppState::new(engine)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_standard_punch_returns_201_with_names() {
        let router = create_router(create_test_state());

        let (status, body) = send(
            router,
            post_json(
                "/punches",
                json!({
                    "employee_id": 1,
                    "unit_id": 1,
                    "date": "2025-06-19",
                    "entry_time": "08:00:00",
                    "exit_time": "17:00:00"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["kind"], "combined");
        assert_eq!(body["employee_name"], "Maria Souza");
        assert_eq!(body["unit_name"], "Central Health Post");
        assert_eq!(body["shift_type"], "8h");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let (status, body) = send(
            router,
            Request::builder()
                .method("POST")
                .uri("/punches")
                .header("Content-Type", "application/json")
                .body(Body::from("{invalid json"))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_second_open_entry_returns_409() {
        let state = create_test_state();

        let (status, _) = send(
            create_router(state.clone()),
            post_json(
                "/punches",
                json!({
                    "employee_id": 2,
                    "unit_id": 1,
                    "date": "2025-06-19",
                    "entry_time": "08:00:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            create_router(state),
            post_json(
                "/punches",
                json!({
                    "employee_id": 2,
                    "unit_id": 1,
                    "date": "2025-06-19",
                    "entry_time": "09:00:00"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "OPEN_ENTRY_CONFLICT");
        assert!(body["message"].as_str().unwrap().contains("2025-06-19 08:00"));
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let router = create_router(create_test_state());

        let (status, body) = send(
            router,
            post_json(
                "/punches",
                json!({
                    "employee_id": 99,
                    "unit_id": 1,
                    "date": "2025-06-19",
                    "entry_time": "08:00:00"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_unknown_record_returns_404() {
        let router = create_router(create_test_state());

        let (status, body) = send(
            router,
            Request::builder()
                .method("DELETE")
                .uri("/punches/77")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_monthly_report_for_empty_period_returns_404() {
        let router = create_router(create_test_state());

        let (status, body) = send(
            router,
            Request::builder()
                .method("GET")
                .uri("/reports/monthly?employee_id=1&month=6&year=2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "EMPTY_PERIOD");
    }
}
