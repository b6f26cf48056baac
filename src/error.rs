use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scheduling::ScheduleError;

/// Ошибки ядра, возвращаемые вызывающей стороне как значения.
/// Единственная фатальная ситуация - недоступность хранилища (`Db`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("Место не найдено")]
    SeatNotFound,
    #[error("Место уже забронировано")]
    SeatAlreadyBooked,
    #[error("{0} не найден")]
    NotFound(&'static str),
    #[error("Некорректный запрос: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Schedule(ScheduleError::OutOfHours)
            | ApiError::Schedule(ScheduleError::ClosingHours) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Schedule(ScheduleError::Overlap { .. }) => StatusCode::CONFLICT,
            ApiError::SeatNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SeatAlreadyBooked => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Db(e) => {
                tracing::error!("database error: {:?}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Ошибка базы данных"})),
                )
                    .into_response();
            }
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
