use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiError, services::booking, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions/{id}/seats", get(get_seat_grid))
        .route("/orders", post(reserve_seat))
        .route("/orders/{code}", get(get_order))
        .route("/orders/{code}/confirm", patch(confirm_order))
        .route("/orders/{code}/cancel", patch(cancel_order))
}

/* ---------- GET /api/sessions/{id}/seats ---------- */

#[derive(Debug, Serialize)]
struct SeatGridResponse {
    session_id: i64,
    rows: i32,
    places: i32,
    // grid[ряд][место] -> занято
    grid: Vec<Vec<bool>>,
}

async fn get_seat_grid(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let grid = booking::seat_grid(&state.db.pool, session_id).await?;
    Ok((
        StatusCode::OK,
        Json(SeatGridResponse {
            session_id: grid.session_id,
            rows: grid.rows,
            places: grid.places,
            grid: grid.grid,
        }),
    ))
}

/* ---------- POST /api/orders ---------- */

#[derive(Debug, Deserialize)]
struct ReserveSeatRequest {
    session_id: i64,
    row: i32,
    place: i32,
    buyer_name: String,
}

#[derive(Debug, Serialize)]
struct ReserveSeatResponse {
    ticket_code: String,
    film_title: String,
    hall_name: String,
    price: i32,
    show_time: chrono::NaiveDateTime,
    row: i32,
    place: i32,
}

async fn reserve_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveSeatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.session_id <= 0 || req.row <= 0 || req.place <= 0 {
        return Err(ApiError::BadRequest(
            "session_id, row и place должны быть > 0".to_string(),
        ));
    }
    if req.buyer_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "имя покупателя не может быть пустым".to_string(),
        ));
    }

    let ticket = booking::reserve_seat(
        &state.db.pool,
        req.session_id,
        req.row,
        req.place,
        req.buyer_name.trim(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReserveSeatResponse {
            ticket_code: ticket.ticket_code,
            film_title: ticket.film_title,
            hall_name: ticket.hall_name,
            price: ticket.price,
            show_time: ticket.show_time,
            row: ticket.row,
            place: ticket.place,
        }),
    ))
}

/* ---------- GET /api/orders/{code} ---------- */

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = booking::get_order(&state.db.pool, &code).await?;
    Ok((StatusCode::OK, Json(order)))
}

/* ---------- PATCH /api/orders/{code}/confirm | /cancel ---------- */

async fn confirm_order(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    booking::confirm_order(&state.db.pool, &code).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Заказ подтвержден"})),
    ))
}

async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    booking::cancel_order(&state.db.pool, &code).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Заказ отменен"})),
    ))
}
