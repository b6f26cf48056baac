use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub film_id: i64,
    pub hall_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    // end_time < start_time - сеанс заканчивается после полуночи
    pub end_time: Option<NaiveTime>,
}
