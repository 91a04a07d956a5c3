//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every section has defaults so that a bare environment still
//! produces a runnable (in-memory) configuration.

pub mod app;
pub mod database;
pub mod event;
pub mod logging;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::database::DatabaseConfig;
pub use self::event::{EventConfig, ReservationPolicyConfig};
pub use self::logging::LoggingConfig;
pub use self::store::{StoreConfig, StoreProvider};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Durable store selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// The event whose inventory this deployment owns.
    #[serde(default)]
    pub event: EventConfig,
    /// Reservation policy limits.
    #[serde(default)]
    pub reservation: ReservationPolicyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `TICKETBOSS_` (nested keys separated by `__`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TICKETBOSS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations that cannot produce a consistent inventory.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.event.id.trim().is_empty() {
            return Err(AppError::configuration("event.id must not be empty"));
        }
        if self.event.total_seats < 0 {
            return Err(AppError::configuration(format!(
                "event.total_seats must be non-negative, got {}",
                self.event.total_seats
            )));
        }
        if self.reservation.max_seats_per_request < 1 {
            return Err(AppError::configuration(
                "reservation.max_seats_per_request must be at least 1",
            ));
        }
        if self.store.provider == StoreProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when store.provider = \"postgres\"",
            ));
        }
        Ok(())
    }
}
