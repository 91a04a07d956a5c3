//! Reservation lifecycle: `confirmed -> cancelled`, one way, exactly once.

pub mod service;

pub use service::{CreatedReservation, ReservationRegister, ReservationSummary};
