//! Event inventory entities.

pub mod model;

pub use model::{Event, InventorySnapshot, NewEvent};
