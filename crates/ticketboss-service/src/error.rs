//! Failure taxonomy of the reservation protocol.
//!
//! Every failed `create`/`cancel` surfaces as exactly one [`ReservationError`]
//! variant. Lost races are detected through affected-row counts and become
//! [`ReservationError::Conflict`]; the caller decides whether to retry.

use ticketboss_core::error::AppError;
use ticketboss_core::types::{EventId, ReservationId};

/// Result alias for reservation operations.
pub type ReservationResult<T> = Result<T, ReservationError>;

/// Closed set of reservation failures.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    /// The request violated a validation rule.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Offending request field.
        field: &'static str,
        /// Which rule was broken.
        reason: String,
    },

    /// The pre-check found fewer seats than requested.
    #[error("not enough seats left: requested {requested}, available {available}")]
    InsufficientCapacity {
        /// Seats asked for.
        requested: i32,
        /// Seats available in the snapshot.
        available: i32,
    },

    /// Another writer changed the inventory after our snapshot.
    #[error("inventory of {event_id} changed since version {expected_version}")]
    Conflict {
        /// Event whose inventory moved.
        event_id: EventId,
        /// Version the losing writer had observed.
        expected_version: i64,
    },

    /// Absent or already cancelled.
    #[error("reservation {reservation_id} not found or already cancelled")]
    NotFound {
        /// The id that was looked up.
        reservation_id: ReservationId,
    },

    /// Store failure or invariant violation.
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl ReservationError {
    /// Shorthand for [`ReservationError::InvalidInput`].
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Returns whether restarting from a fresh snapshot may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::InvalidInput { .. } => AppError::invalid_input(err.to_string()),
            ReservationError::InsufficientCapacity { .. } => {
                AppError::insufficient_capacity("Not enough seats left")
            }
            ReservationError::Conflict { .. } => {
                AppError::conflict("Inventory changed concurrently. Try again")
            }
            ReservationError::NotFound { .. } => {
                AppError::not_found("Reservation not found or already cancelled")
            }
            ReservationError::Internal(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use ticketboss_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_kinds_after_conversion() {
        let cases: Vec<(ReservationError, ErrorKind)> = vec![
            (
                ReservationError::invalid_input("seats", "must be at least 1"),
                ErrorKind::InvalidInput,
            ),
            (
                ReservationError::InsufficientCapacity {
                    requested: 5,
                    available: 2,
                },
                ErrorKind::InsufficientCapacity,
            ),
            (
                ReservationError::Conflict {
                    event_id: EventId::from("e"),
                    expected_version: 3,
                },
                ErrorKind::Conflict,
            ),
            (
                ReservationError::NotFound {
                    reservation_id: ReservationId::new(),
                },
                ErrorKind::NotFound,
            ),
            (
                ReservationError::Internal(AppError::internal("boom")),
                ErrorKind::Internal,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(AppError::from(err).kind, kind);
        }
    }

    #[test]
    fn test_invalid_input_message_names_field() {
        let app: AppError = ReservationError::invalid_input("partnerId", "must not be blank").into();
        assert_eq!(app.message, "invalid partnerId: must not be blank");
    }

    #[test]
    fn test_only_conflict_is_retryable() {
        assert!(
            ReservationError::Conflict {
                event_id: EventId::from("e"),
                expected_version: 0,
            }
            .is_conflict()
        );
        assert!(
            !ReservationError::InsufficientCapacity {
                requested: 1,
                available: 0,
            }
            .is_conflict()
        );
    }
}
