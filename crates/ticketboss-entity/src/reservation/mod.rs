//! Reservation entities.

pub mod model;
pub mod status;

pub use model::{NewReservation, Reservation};
pub use status::ReservationStatus;
