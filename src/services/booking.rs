//! Матрица мест, атомарное бронирование и жизненный цикл заказа.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::order::{format_ticket_code, OrderStatus};
use crate::models::{Order, Seat};
use crate::seating;
use crate::services::scheduler;

/// Идемпотентная материализация матрицы мест сеанса как диф, а не
/// пересоздание: добавляем недостающие пары (ряд, место), лишние пары
/// удаляем только если на них не ссылается живой заказ. Безопасно при
/// конкурентных вызовах за счет ON CONFLICT DO NOTHING.
pub async fn ensure_seats(
    conn: &mut PgConnection,
    session_id: i64,
    rows: i32,
    places: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO seats (session_id, "row", place)
        SELECT $1, r, p
        FROM generate_series(1, $2) AS r, generate_series(1, $3) AS p
        ON CONFLICT (session_id, "row", place) DO NOTHING
        "#,
    )
    .bind(session_id)
    .bind(rows)
    .bind(places)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM seats
        WHERE session_id = $1 AND ("row" > $2 OR place > $3) AND order_id IS NULL
        "#,
    )
    .bind(session_id)
    .bind(rows)
    .bind(places)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub struct SeatGrid {
    pub session_id: i64,
    pub rows: i32,
    pub places: i32,
    pub grid: Vec<Vec<bool>>,
}

/// Полная сетка R x P с флагами занятости по зафиксированному состоянию.
pub async fn seat_grid(pool: &PgPool, session_id: i64) -> Result<SeatGrid, ApiError> {
    let hall_id: i64 = sqlx::query_scalar("SELECT hall_id FROM sessions WHERE id = $1")
        .bind(session_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Сеанс"))?;
    let hall = scheduler::fetch_hall(pool, hall_id).await?;

    let mut conn = pool.acquire().await?;
    ensure_seats(&mut *conn, session_id, hall.count_rows, hall.count_places).await?;

    let seats: Vec<Seat> = sqlx::query_as(
        r#"
        SELECT id, session_id, "row", place, is_booked, order_id
        FROM seats WHERE session_id = $1
        ORDER BY "row", place
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    let booked: Vec<(i32, i32)> = seats
        .iter()
        .filter(|s| s.is_booked)
        .map(|s| (s.row, s.place))
        .collect();

    Ok(SeatGrid {
        session_id,
        rows: hall.count_rows,
        places: hall.count_places,
        grid: seating::build_grid(hall.count_rows, hall.count_places, &booked),
    })
}

pub struct ReservedTicket {
    pub order_id: i64,
    pub ticket_code: String,
    pub film_title: String,
    pub hall_name: String,
    pub price: i32,
    pub show_time: chrono::NaiveDateTime,
    pub row: i32,
    pub place: i32,
}

#[derive(sqlx::FromRow)]
struct SessionSnapshot {
    film_title: String,
    hall_name: String,
    price: i32,
    date: chrono::NaiveDate,
    start_time: chrono::NaiveTime,
    count_rows: i32,
    count_places: i32,
}

/// Бронирует место: номер билета из выделенной sequence, вставка заказа
/// и compare-and-swap занятия места - одной транзакцией. Из любого числа
/// конкурентных покупателей место получает ровно один, остальным
/// возвращается `SeatAlreadyBooked`.
pub async fn reserve_seat(
    pool: &PgPool,
    session_id: i64,
    row: i32,
    place: i32,
    buyer_name: &str,
) -> Result<ReservedTicket, ApiError> {
    let mut tx = pool.begin().await?;

    let snapshot: SessionSnapshot = sqlx::query_as(
        r#"
        SELECT f.title AS film_title, h.name AS hall_name, h.price,
               s.date, s.start_time, h.count_rows, h.count_places
        FROM sessions s
        JOIN films f ON f.id = s.film_id
        JOIN halls h ON h.id = s.hall_id
        WHERE s.id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Сеанс"))?;

    ensure_seats(
        &mut *tx,
        session_id,
        snapshot.count_rows,
        snapshot.count_places,
    )
    .await?;

    let seq: i64 = sqlx::query_scalar("SELECT nextval('ticket_code_seq')")
        .fetch_one(&mut *tx)
        .await?;
    let ticket_code = format_ticket_code(seq);
    let show_time = snapshot.date.and_time(snapshot.start_time);

    let order_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO orders (ticket_code, buyer_name, film_title, hall_name,
                            price, show_time, "row", place, session_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&ticket_code)
    .bind(buyer_name)
    .bind(&snapshot.film_title)
    .bind(&snapshot.hall_name)
    .bind(snapshot.price)
    .bind(show_time)
    .bind(row)
    .bind(place)
    .bind(session_id)
    .fetch_one(&mut *tx)
    .await?;

    // CAS: занимаем место, только если оно все еще свободно
    let claimed = sqlx::query(
        r#"
        UPDATE seats
        SET is_booked = TRUE, order_id = $1
        WHERE session_id = $2 AND "row" = $3 AND place = $4 AND is_booked = FALSE
        "#,
    )
    .bind(order_id)
    .bind(session_id)
    .bind(row)
    .bind(place)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        tx.rollback().await?;
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM seats WHERE session_id = $1 AND "row" = $2 AND place = $3)"#,
        )
        .bind(session_id)
        .bind(row)
        .bind(place)
        .fetch_one(pool)
        .await?;
        return Err(if exists {
            ApiError::SeatAlreadyBooked
        } else {
            ApiError::SeatNotFound
        });
    }

    tx.commit().await?;

    info!(session_id, row, place, %ticket_code, "seat reserved");

    Ok(ReservedTicket {
        order_id,
        ticket_code,
        film_title: snapshot.film_title,
        hall_name: snapshot.hall_name,
        price: snapshot.price,
        show_time,
        row,
        place,
    })
}

/// Заказ по номеру билета.
pub async fn get_order(pool: &PgPool, ticket_code: &str) -> Result<Order, ApiError> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT id, ticket_code, buyer_name, film_title, hall_name, price,
               show_time, "row", place, session_id, status, created_at, updated_at
        FROM orders WHERE ticket_code = $1
        "#,
    )
    .bind(ticket_code)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::NotFound("Заказ"))
}

/// Подтверждение заказа: pending -> confirmed, повторное подтверждение -
/// тихий no-op. Заказ под FOR UPDATE, чтобы конкурентные переходы
/// выстраивались в очередь.
pub async fn confirm_order(pool: &PgPool, ticket_code: &str) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let (order_id, status) = lock_order(&mut tx, ticket_code).await?;
    if let Some(next) = status.on_confirm() {
        set_status(&mut tx, order_id, next).await?;
        info!(%ticket_code, "order confirmed");
    }

    tx.commit().await?;
    Ok(())
}

/// Отмена заказа: настоящий переход в cancelled освобождает связанное
/// место (флаг и обратная ссылка снимаются) в той же транзакции.
/// Повторная отмена - тихий no-op; cancelled - терминальный статус.
pub async fn cancel_order(pool: &PgPool, ticket_code: &str) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let (order_id, status) = lock_order(&mut tx, ticket_code).await?;
    if let Some(next) = status.on_cancel() {
        set_status(&mut tx, order_id, next).await?;
        sqlx::query("UPDATE seats SET is_booked = FALSE, order_id = NULL WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        info!(%ticket_code, "order cancelled, seat released");
    }

    tx.commit().await?;
    Ok(())
}

async fn lock_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ticket_code: &str,
) -> Result<(i64, OrderStatus), ApiError> {
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, status FROM orders WHERE ticket_code = $1 FOR UPDATE")
            .bind(ticket_code)
            .fetch_optional(&mut **tx)
            .await?;
    let (order_id, raw) = row.ok_or(ApiError::NotFound("Заказ"))?;
    match OrderStatus::parse(&raw) {
        Some(status) => Ok((order_id, status)),
        None => {
            warn!(%ticket_code, status = %raw, "unknown order status in storage");
            Err(ApiError::NotFound("Заказ"))
        }
    }
}

async fn set_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
    status: OrderStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
