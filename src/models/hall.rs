use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub number: i32,
    pub name: String,
    pub count_rows: i32,
    pub count_places: i32,
    pub price: i32,
}
