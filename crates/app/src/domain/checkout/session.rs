//! A single cashier's checkout session.
//!
//! Explicit session state passed to whoever needs it; nothing here is
//! global. One terminal runs one session with one cart at a time.

use std::{fmt, sync::Arc};

use kaha::{
    Cart, CartTotals, FlatFeeTax, OrderType, QuantityChange,
    cart::TaxPolicy,
};
use uuid::Uuid;

use crate::domain::catalog::models::Product;

use super::{guard::{GuardRejection, StockGuard}, store::CheckoutStore};

/// Order number the terminal starts counting from.
pub const FIRST_ORDER_NUMBER: u64 = 2128;

/// Cart, counters, and customer details for one terminal.
pub struct CheckoutSession {
    cart: Cart,
    guard: StockGuard,
    tax_policy: Arc<dyn TaxPolicy>,
    order_number: u64,
}

impl CheckoutSession {
    /// Opens a session against the given store with the default flat
    /// tax and starting order number.
    #[must_use]
    pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
        Self {
            cart: Cart::new(),
            guard: StockGuard::new(store),
            tax_policy: Arc::new(FlatFeeTax::default()),
            order_number: FIRST_ORDER_NUMBER,
        }
    }

    /// Replaces the tax policy.
    #[must_use]
    pub fn with_tax_policy(mut self, tax_policy: Arc<dyn TaxPolicy>) -> Self {
        self.tax_policy = tax_policy;
        self
    }

    /// Starts the order numbering from a specific value.
    #[must_use]
    pub fn with_order_number(mut self, order_number: u64) -> Self {
        self.order_number = order_number;
        self
    }

    /// The current cart, read-only.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The order number the next settlement will use.
    #[must_use]
    pub fn order_number(&self) -> u64 {
        self.order_number
    }

    /// The active tax policy.
    #[must_use]
    pub fn tax_policy(&self) -> &dyn TaxPolicy {
        self.tax_policy.as_ref()
    }

    /// Totals for the current cart under the active tax policy.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals(self.tax_policy.as_ref())
    }

    /// Sets dine-in or take-out.
    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.cart.order_type = order_type;
    }

    /// Sets the customer name shown on the order and receipt.
    pub fn set_customer_name(&mut self, name: Option<String>) {
        self.cart.customer_name = name;
    }

    /// Adds one unit of a product after the guard clears the increase.
    ///
    /// # Errors
    ///
    /// Returns [`GuardRejection`] with the cart unchanged when stock
    /// does not cover one more unit.
    pub async fn add_item(&mut self, product: &Product) -> Result<(), GuardRejection> {
        self.guard.allow_increase(&self.cart, product.uuid, 1).await?;

        self.cart.add_item(product.uuid, &product.name, product.price);

        Ok(())
    }

    /// Applies a quantity delta to a product already in the cart.
    /// Increases are guard-checked; decreases never are.
    ///
    /// # Errors
    ///
    /// Returns [`GuardRejection`] with the cart unchanged when an
    /// increase is not covered by stock.
    pub async fn change_quantity(
        &mut self,
        product: Uuid,
        delta: i32,
    ) -> Result<QuantityChange, GuardRejection> {
        if delta > 0 {
            self.guard
                .allow_increase(&self.cart, product, delta.unsigned_abs())
                .await?;
        }

        Ok(self.cart.change_quantity(product, delta))
    }

    /// Empties the cart. Idempotent.
    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Called by the orchestrator after a successful settlement.
    pub(crate) fn on_settled(&mut self) {
        self.cart.clear();
        self.order_number += 1;
    }
}

impl fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("cart", &self.cart)
            .field("order_number", &self.order_number)
            .finish_non_exhaustive()
    }
}
