//! Datastore boundary for checkout.
//!
//! Settlement talks to the datastore only through [`CheckoutStore`], so
//! the orchestrator can run against PostgreSQL, the in-memory store, or
//! a mock.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use super::{
    errors::StoreError,
    models::{NewLineItem, NewOrder, NewPayment, OrderId, StockLevel},
};

mod memory;
mod postgres;

pub use memory::MemoryCheckoutStore;
pub use postgres::PgCheckoutStore;

#[automock]
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Current stock for a product.
    async fn inventory_level(&self, product: Uuid) -> Result<StockLevel, StoreError>;

    /// Creates the order header and returns the assigned id.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError>;

    /// Inserts all line items for an order in one batch.
    async fn insert_line_items(
        &self,
        order: OrderId,
        lines: &[NewLineItem],
    ) -> Result<(), StoreError>;

    /// Records the single payment for an order.
    async fn insert_payment(&self, order: OrderId, payment: NewPayment) -> Result<(), StoreError>;

    /// Conditionally decrements stock; returns whether a row was
    /// affected. Stock never goes negative.
    async fn decrement_inventory(&self, product: Uuid, quantity: u32) -> Result<bool, StoreError>;

    /// Performs the order, line-item, payment, and inventory writes in
    /// one server-side transaction.
    async fn settle_order(
        &self,
        order: NewOrder,
        lines: &[NewLineItem],
        payment: NewPayment,
    ) -> Result<OrderId, StoreError>;
}
