//! Event seeding and reservation policy configuration.

use serde::{Deserialize, Serialize};

/// The single event whose inventory this deployment owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Stable event identifier.
    #[serde(default = "default_event_id")]
    pub id: String,
    /// Human-readable event name.
    #[serde(default = "default_event_name")]
    pub name: String,
    /// Fixed seat capacity used when the event is first seeded.
    #[serde(default = "default_total_seats")]
    pub total_seats: i32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            id: default_event_id(),
            name: default_event_name(),
            total_seats: default_total_seats(),
        }
    }
}

/// Limits applied to every reservation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationPolicyConfig {
    /// Maximum seats a single reservation may hold.
    #[serde(default = "default_max_seats")]
    pub max_seats_per_request: i32,
}

impl Default for ReservationPolicyConfig {
    fn default() -> Self {
        Self {
            max_seats_per_request: default_max_seats(),
        }
    }
}

fn default_event_id() -> String {
    "node-meetup-2025".to_string()
}

fn default_event_name() -> String {
    "Node.js Meet-up".to_string()
}

fn default_total_seats() -> i32 {
    500
}

fn default_max_seats() -> i32 {
    10
}
