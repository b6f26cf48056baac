use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiError, services::scheduler, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/slots", get(list_slots))
}

fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("дата должна быть в формате ГГГГ-ММ-ДД".to_string()))
}

fn parse_time(s: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ApiError::BadRequest("время должно быть в формате ЧЧ:ММ".to_string()))
}

fn fmt_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/* ---------- POST /api/sessions ---------- */

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    film_id: i64,
    hall_id: i64,
    date: String,
    start_time: String,
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    id: i64,
    end_time: Option<String>,
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.film_id <= 0 || req.hall_id <= 0 {
        return Err(ApiError::BadRequest(
            "film_id и hall_id должны быть > 0".to_string(),
        ));
    }
    let date = parse_date(&req.date)?;
    let start = parse_time(&req.start_time)?;

    let created =
        scheduler::create_session(&state.db.pool, req.film_id, req.hall_id, date, start).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id: created.id,
            end_time: created.end_time.map(fmt_time),
        }),
    ))
}

/* ---------- GET /api/sessions/slots ---------- */

#[derive(Debug, Deserialize)]
struct SlotsQuery {
    film_id: i64,
    hall_id: i64,
    date: String,
}

#[derive(Debug, Serialize)]
struct SlotResponse {
    start: String,
    end: String,
}

async fn list_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date(&params.date)?;

    let slots =
        scheduler::list_available_slots(&state.db.pool, params.film_id, params.hall_id, date)
            .await?;

    let payload: Vec<SlotResponse> = slots
        .into_iter()
        .map(|s| SlotResponse {
            start: fmt_time(s.start),
            end: fmt_time(s.end),
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}
