//! Fixture data for tests, demos, and database seeding.

pub mod menu;
