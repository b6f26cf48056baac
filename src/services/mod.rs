pub mod booking;
pub mod scheduler;
