//! Inventory Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::try_get_count;

use super::models::InventoryRecord;

const GET_INVENTORY_SQL: &str = include_str!("sql/get_inventory.sql");
const LIST_INVENTORY_SQL: &str = include_str!("sql/list_inventory.sql");
const INIT_INVENTORY_SQL: &str = include_str!("sql/init_inventory.sql");
const RESTOCK_INVENTORY_SQL: &str = include_str!("sql/restock_inventory.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(GET_INVENTORY_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_records(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<InventoryRecord>, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(LIST_INVENTORY_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn init_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        quantity: u32,
        threshold: u32,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(INIT_INVENTORY_SQL)
            .bind(product)
            .bind(i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
            .bind(i32::try_from(threshold).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn restock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Uuid,
        quantity: u32,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(RESTOCK_INVENTORY_SQL)
            .bind(product)
            .bind(i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: row.try_get("product_uuid")?,
            quantity_in_stock: try_get_count(row, "quantity_in_stock")?,
            minimum_threshold: try_get_count(row, "minimum_threshold")?,
            last_restocked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_restocked_at")?
                .map(SqlxTimestamp::to_jiff),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
