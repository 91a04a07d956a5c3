//! # ticketboss-database
//!
//! The durable store consumed by the inventory ledger. Defines the
//! [`InventoryStore`] / [`StoreTransaction`] seam and provides a PostgreSQL
//! implementation plus a process-local one selected through configuration.

pub mod store;

pub use store::{InventoryStore, StoreManager, StoreTransaction};
