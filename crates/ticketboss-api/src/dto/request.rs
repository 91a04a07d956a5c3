//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Body of `POST /reservations`.
///
/// The upper seat bound comes from configuration and is enforced by the
/// reservation register.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Caller identifier; surrounding whitespace is ignored.
    #[validate(custom(function = "not_blank"))]
    pub partner_id: String,
    /// Seats to book.
    #[validate(range(min = 1, message = "seats must be at least 1"))]
    pub seats: i32,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("partnerId must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Flattens validation errors into one line for the response body.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
