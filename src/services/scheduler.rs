//! Создание сеансов и подбор свободных слотов.

use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::PgPool;
use tracing::info;

use crate::error::ApiError;
use crate::models::{Film, Hall, Session};
use crate::scheduling::{self, ScheduleError, Showing};
use crate::services::booking;

#[derive(Debug)]
pub struct CreatedSession {
    pub id: i64,
    pub end_time: Option<NaiveTime>,
}

pub struct SlotTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

pub async fn fetch_film(pool: &PgPool, film_id: i64) -> Result<Film, ApiError> {
    sqlx::query_as::<_, Film>(
        "SELECT id, title, duration_min, beginning, ending FROM films WHERE id = $1",
    )
    .bind(film_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("Фильм"))
}

pub async fn fetch_hall(pool: &PgPool, hall_id: i64) -> Result<Hall, ApiError> {
    sqlx::query_as::<_, Hall>(
        "SELECT id, number, name, count_rows, count_places, price FROM halls WHERE id = $1",
    )
    .bind(hall_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("Зал"))
}

/// Создает сеанс: валидация часов работы, расчет окончания, проверка
/// пересечений и вставка - одной транзакцией под advisory-блокировкой
/// пары (зал, дата), чтобы два конкурентных создателя не прошли проверку
/// одновременно. Места зала материализуются в той же транзакции.
pub async fn create_session(
    pool: &PgPool,
    film_id: i64,
    hall_id: i64,
    date: NaiveDate,
    start: NaiveTime,
) -> Result<CreatedSession, ApiError> {
    let film = fetch_film(pool, film_id).await?;
    let hall = fetch_hall(pool, hall_id).await?;

    let start_min = scheduling::minutes_of(start);
    scheduling::validate_start(start_min)?;
    let end_min = scheduling::projected_end(start_min, film.known_duration())?;

    let mut tx = pool.begin().await?;

    // Сериализуем конкурентные создания в рамках одного зала и даты
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(hall.id as i32)
        .bind(date.num_days_from_ce())
        .execute(&mut *tx)
        .await?;

    let sessions: Vec<Session> = sqlx::query_as(
        "SELECT id, film_id, hall_id, date, start_time, end_time
         FROM sessions WHERE hall_id = $1 AND date = $2",
    )
    .bind(hall.id)
    .bind(date)
    .fetch_all(&mut *tx)
    .await?;

    let existing: Vec<(i64, Showing)> = sessions
        .iter()
        .map(|s| (s.id, Showing::from_times(s.start_time, s.end_time)))
        .collect();

    let candidate = Showing {
        start: start_min,
        end: end_min,
    };
    if let Some(session_id) = scheduling::find_conflict(candidate, &existing) {
        return Err(ScheduleError::Overlap { session_id }.into());
    }

    let end_time = end_min.map(scheduling::time_of);
    let session_id: i64 = sqlx::query_scalar(
        "INSERT INTO sessions (film_id, hall_id, date, start_time, end_time)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(film.id)
    .bind(hall.id)
    .bind(date)
    .bind(start)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await?;

    booking::ensure_seats(&mut *tx, session_id, hall.count_rows, hall.count_places).await?;

    tx.commit().await?;

    info!(
        session_id,
        film_id = film.id,
        hall_id = hall.id,
        %date,
        %start,
        "session created"
    );

    Ok(CreatedSession {
        id: session_id,
        end_time,
    })
}

/// Свободные слоты зала на дату для фильма: жадный проход по сетке
/// кандидатов (см. `scheduling::available_slots`). Детерминированно,
/// без состояния между вызовами.
pub async fn list_available_slots(
    pool: &PgPool,
    film_id: i64,
    hall_id: i64,
    date: NaiveDate,
) -> Result<Vec<SlotTimes>, ApiError> {
    let film = fetch_film(pool, film_id).await?;
    let hall = fetch_hall(pool, hall_id).await?;

    let sessions: Vec<Session> = sqlx::query_as(
        "SELECT id, film_id, hall_id, date, start_time, end_time
         FROM sessions WHERE hall_id = $1 AND date = $2",
    )
    .bind(hall.id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    let existing: Vec<Showing> = sessions
        .iter()
        .map(|s| Showing::from_times(s.start_time, s.end_time))
        .collect();

    Ok(scheduling::available_slots(film.known_duration(), &existing)
        .into_iter()
        .map(|slot| SlotTimes {
            start: scheduling::time_of(slot.start),
            end: scheduling::time_of(slot.end),
        })
        .collect())
}
