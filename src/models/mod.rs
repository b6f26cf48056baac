pub mod film;
pub mod hall;
pub mod order;
pub mod seat;
pub mod session;

pub use film::Film;
pub use hall::Hall;
pub use order::{Order, OrderStatus};
pub use seat::Seat;
pub use session::Session;
