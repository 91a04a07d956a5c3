//! # ticketboss-service
//!
//! The optimistic concurrency protocol over event seat inventory.
//!
//! [`InventoryLedger`] owns the seat counter and its version stamp.
//! [`ReservationRegister`] turns booking and cancellation intents into
//! read-check-write cycles against the ledger. Dependencies are injected at
//! construction time via `Arc` references.

pub mod error;
pub mod ledger;
pub mod reservation;

pub use error::{ReservationError, ReservationResult};
pub use ledger::{AdjustOutcome, InventoryLedger};
pub use reservation::{CreatedReservation, ReservationRegister, ReservationSummary};
