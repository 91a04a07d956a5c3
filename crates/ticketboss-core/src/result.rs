//! Convenience result type alias for TicketBoss.

use crate::error::AppError;

/// A specialized `Result` type for TicketBoss operations.
pub type AppResult<T> = Result<T, AppError>;
