//! Inventory models.

use jiff::Timestamp;
use uuid::Uuid;

/// One inventory record per product.
#[derive(Debug, Clone)]
pub struct InventoryRecord {
    pub product_uuid: Uuid,
    pub quantity_in_stock: u32,
    pub minimum_threshold: u32,
    pub last_restocked_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl InventoryRecord {
    /// True when the product should be flagged for restocking.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.quantity_in_stock <= self.minimum_threshold
    }
}
