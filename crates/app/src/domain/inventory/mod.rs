//! Inventory records and restocking.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::InventoryServiceError;
pub use service::*;
