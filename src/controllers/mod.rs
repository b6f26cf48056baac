pub mod bookings;
pub mod catalog;
pub mod sessions;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(sessions::routes())
        .merge(bookings::routes())
        .merge(catalog::routes())
}
