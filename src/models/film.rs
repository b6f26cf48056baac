use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub title: String,
    // NULL или 0 - длительность неизвестна, сеанс без расчетного окончания
    pub duration_min: Option<i32>,
    pub beginning: NaiveDate,
    pub ending: NaiveDate,
}

impl Film {
    /// Известная длительность в минутах, если она задана и положительна.
    pub fn known_duration(&self) -> Option<i32> {
        self.duration_min.filter(|m| *m > 0)
    }
}
