//! Витрины внешних справочников: фильмы и залы, только чтение.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{Film, Hall},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/films", get(list_films))
        .route("/halls", get(list_halls))
}

async fn list_films(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let films = sqlx::query_as::<_, Film>(
        "SELECT id, title, duration_min, beginning, ending FROM films ORDER BY title",
    )
    .fetch_all(&state.db.pool)
    .await?;
    Ok((StatusCode::OK, Json(films)))
}

async fn list_halls(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let halls = sqlx::query_as::<_, Hall>(
        "SELECT id, number, name, count_rows, count_places, price FROM halls ORDER BY number",
    )
    .fetch_all(&state.db.pool)
    .await?;
    Ok((StatusCode::OK, Json(halls)))
}
