//! Persistence and settlement for the Kaha point-of-sale.
//!
//! Domain services run against PostgreSQL through [`sqlx`]; every
//! service and the checkout datastore sit behind traits so callers and
//! tests can swap implementations.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
