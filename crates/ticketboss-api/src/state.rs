//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use ticketboss_core::config::AppConfig;
use ticketboss_core::types::EventId;
use ticketboss_database::store::StoreManager;
use ticketboss_service::ReservationRegister;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Configured inventory store
    pub store: StoreManager,
    /// Reservation register for the configured event
    pub register: Arc<ReservationRegister>,
}

impl AppState {
    /// Wires the register for `config.event` over `store`.
    pub fn new(config: AppConfig, store: StoreManager) -> Self {
        let register = ReservationRegister::new(
            store.store(),
            EventId::new(config.event.id.clone()),
            config.reservation.clone(),
        );

        Self {
            config: Arc::new(config),
            store,
            register: Arc::new(register),
        }
    }
}
