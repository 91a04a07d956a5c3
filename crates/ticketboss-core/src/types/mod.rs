//! Core type definitions used across the TicketBoss workspace.

pub mod id;

pub use id::{EventId, ReservationId};
