//! Shared application context.
//!
//! Built once at startup; everything downstream borrows trait objects
//! from here instead of constructing services itself.

use std::{sync::Arc, time::Duration};

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, Db},
    domain::{
        catalog::service::{CatalogService, PgCatalogService},
        checkout::{CheckoutStore, PaymentGateway, PgCheckoutStore, SimulatedGateway},
        inventory::service::{InventoryService, PgInventoryService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("could not connect to the database")]
    Database(#[from] sqlx::Error),

    #[error("could not run migrations")]
    Migration(#[from] MigrateError),
}

/// Services and stores wired against one connection pool.
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub inventory: Arc<dyn InventoryService>,
    pub store: Arc<dyn CheckoutStore>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppContext {
    /// Connects, migrates, and wires the PostgreSQL-backed services
    /// with the simulated payment gateway.
    ///
    /// # Errors
    ///
    /// Fails when the database is unreachable or a migration cannot be
    /// applied.
    pub async fn from_database_url(database_url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(database_url).await?;

        database::run_migrations(&pool).await?;
        info!("database migrations applied");

        let db = Db::new(pool.clone());

        Ok(Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            inventory: Arc::new(PgInventoryService::new(db)),
            store: Arc::new(PgCheckoutStore::new(pool)),
            gateway: Arc::new(SimulatedGateway::with_delay(Duration::from_secs(2))),
        })
    }
}
