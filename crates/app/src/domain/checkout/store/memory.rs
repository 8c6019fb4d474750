//! In-memory checkout store for demos and tests.
//!
//! A single mutex guards all state, so `settle_order` is naturally
//! atomic and concurrent decrements serialize the way a database row
//! lock would.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::domain::checkout::{
    errors::StoreError,
    models::{NewLineItem, NewOrder, NewPayment, OrderId, StockLevel},
};

use super::CheckoutStore;

#[derive(Debug, Clone)]
struct StoredOrder {
    #[expect(dead_code, reason = "retained for operator inspection")]
    order: NewOrder,
    lines: Vec<NewLineItem>,
    payments: Vec<NewPayment>,
}

#[derive(Debug, Default)]
struct Inner {
    stock: FxHashMap<Uuid, StockLevel>,
    orders: FxHashMap<OrderId, StoredOrder>,
    next_order_id: OrderId,
}

/// A [`CheckoutStore`] backed by in-process maps.
#[derive(Debug, Default)]
pub struct MemoryCheckoutStore {
    inner: Mutex<Inner>,
}

impl MemoryCheckoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a product's stock level and threshold.
    pub fn set_stock(&self, product: Uuid, quantity: u32, threshold: u32) {
        self.lock().stock.insert(
            product,
            StockLevel {
                quantity_in_stock: quantity,
                minimum_threshold: threshold,
            },
        );
    }

    /// Stock remaining for a product, if a record exists.
    #[must_use]
    pub fn stock_of(&self, product: Uuid) -> Option<u32> {
        self.lock()
            .stock
            .get(&product)
            .map(|level| level.quantity_in_stock)
    }

    /// Number of order headers written.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Payments recorded against an order.
    #[must_use]
    pub fn payments_for(&self, order: OrderId) -> Vec<NewPayment> {
        self.lock()
            .orders
            .get(&order)
            .map(|stored| stored.payments.clone())
            .unwrap_or_default()
    }

    /// Line items recorded against an order.
    #[must_use]
    pub fn lines_for(&self, order: OrderId) -> Vec<NewLineItem> {
        self.lock()
            .orders
            .get(&order)
            .map(|stored| stored.lines.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn next_id(&mut self) -> OrderId {
        self.next_order_id += 1;
        self.next_order_id
    }

    fn apply_decrement(&mut self, product: Uuid, quantity: u32) -> bool {
        match self.stock.get_mut(&product) {
            Some(level) if level.quantity_in_stock >= quantity => {
                level.quantity_in_stock -= quantity;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl CheckoutStore for MemoryCheckoutStore {
    async fn inventory_level(&self, product: Uuid) -> Result<StockLevel, StoreError> {
        self.lock()
            .stock
            .get(&product)
            .copied()
            .ok_or(StoreError::NotFound)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let mut inner = self.lock();
        let id = inner.next_id();

        inner.orders.insert(
            id,
            StoredOrder {
                order,
                lines: Vec::new(),
                payments: Vec::new(),
            },
        );

        Ok(id)
    }

    async fn insert_line_items(
        &self,
        order: OrderId,
        lines: &[NewLineItem],
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let stored = inner.orders.get_mut(&order).ok_or(StoreError::NotFound)?;

        stored.lines.extend_from_slice(lines);

        Ok(())
    }

    async fn insert_payment(&self, order: OrderId, payment: NewPayment) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let stored = inner.orders.get_mut(&order).ok_or(StoreError::NotFound)?;

        // Mirrors the unique constraint on payments.order_id.
        if !stored.payments.is_empty() {
            return Err(StoreError::Duplicate);
        }

        stored.payments.push(payment);

        Ok(())
    }

    async fn decrement_inventory(&self, product: Uuid, quantity: u32) -> Result<bool, StoreError> {
        Ok(self.lock().apply_decrement(product, quantity))
    }

    async fn settle_order(
        &self,
        order: NewOrder,
        lines: &[NewLineItem],
        payment: NewPayment,
    ) -> Result<OrderId, StoreError> {
        let mut inner = self.lock();

        for line in lines {
            let available = inner
                .stock
                .get(&line.product_uuid)
                .map_or(0, |level| level.quantity_in_stock);

            if available < line.quantity {
                return Err(StoreError::InsufficientStock {
                    product: line.product_uuid,
                });
            }
        }

        let id = inner.next_id();

        for line in lines {
            inner.apply_decrement(line.product_uuid, line.quantity);
        }

        inner.orders.insert(
            id,
            StoredOrder {
                order,
                lines: lines.to_vec(),
                payments: vec![payment],
            },
        );

        Ok(id)
    }
}
