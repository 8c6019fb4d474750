//! Inventory service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::database::Db;

use super::{errors::InventoryServiceError, models::InventoryRecord, repository::PgInventoryRepository};

#[derive(Debug, Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn record_for(&self, product: Uuid) -> Result<InventoryRecord, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_record(&mut tx, product).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_records(&self) -> Result<Vec<InventoryRecord>, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_records(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn set_stock(
        &self,
        product: Uuid,
        quantity: u32,
        threshold: u32,
    ) -> Result<InventoryRecord, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .init_record(&mut tx, product, quantity, threshold)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn restock(
        &self,
        product: Uuid,
        quantity: u32,
    ) -> Result<InventoryRecord, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.restock(&mut tx, product, quantity).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// The inventory record for a product.
    async fn record_for(&self, product: Uuid) -> Result<InventoryRecord, InventoryServiceError>;

    /// All inventory records.
    async fn list_records(&self) -> Result<Vec<InventoryRecord>, InventoryServiceError>;

    /// Creates or overwrites a product's stock level and threshold.
    async fn set_stock(
        &self,
        product: Uuid,
        quantity: u32,
        threshold: u32,
    ) -> Result<InventoryRecord, InventoryServiceError>;

    /// Adds received stock to a product and stamps the restock time.
    async fn restock(
        &self,
        product: Uuid,
        quantity: u32,
    ) -> Result<InventoryRecord, InventoryServiceError>;
}
