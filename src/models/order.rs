use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Заказ (билет). Хранит денормализованный снимок данных сеанса на момент
/// покупки и никогда не удаляется физически.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub ticket_code: String,
    pub buyer_name: String,
    pub film_title: String,
    pub hall_name: String,
    pub price: i32,
    pub show_time: NaiveDateTime,
    pub row: i32,
    pub place: i32,
    pub session_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Статусы заказа и допустимые переходы между ними.
///
/// pending -> confirmed (в одну сторону), {pending, confirmed} -> cancelled.
/// cancelled - терминальный статус, из него переходов нет.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Следующий статус при подтверждении; None - повторный запрос,
    /// состояние не меняется.
    pub fn on_confirm(self) -> Option<Self> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed | OrderStatus::Cancelled => None,
        }
    }

    /// Следующий статус при отмене; None - заказ уже отменен.
    /// Переход Some(_) обязан освобождать связанное место.
    pub fn on_cancel(self) -> Option<Self> {
        match self {
            OrderStatus::Pending | OrderStatus::Confirmed => Some(OrderStatus::Cancelled),
            OrderStatus::Cancelled => None,
        }
    }
}

/// Человекочитаемый номер билета из значения выделенной sequence.
pub fn format_ticket_code(seq: i64) -> String {
    format!("T{:06}", seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_is_one_way_and_idempotent() {
        assert_eq!(
            OrderStatus::Pending.on_confirm(),
            Some(OrderStatus::Confirmed)
        );
        assert_eq!(OrderStatus::Confirmed.on_confirm(), None);
    }

    #[test]
    fn cancel_from_pending_and_confirmed() {
        assert_eq!(
            OrderStatus::Pending.on_cancel(),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(
            OrderStatus::Confirmed.on_cancel(),
            Some(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn cancelled_is_terminal() {
        assert_eq!(OrderStatus::Cancelled.on_cancel(), None);
        assert_eq!(OrderStatus::Cancelled.on_confirm(), None);
    }

    #[test]
    fn status_round_trips_through_db_string() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("paid"), None);
    }

    #[test]
    fn ticket_code_is_fixed_width() {
        assert_eq!(format_ticket_code(1), "T000001");
        assert_eq!(format_ticket_code(42), "T000042");
        assert_eq!(format_ticket_code(1_234_567), "T1234567");
    }
}
