use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub session_id: i64,
    pub row: i32,
    pub place: i32,
    pub is_booked: bool,
    // Слабая ссылка на заказ, занявший место (только для поиска)
    pub order_id: Option<i64>,
}
