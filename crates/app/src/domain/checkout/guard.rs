//! Advisory stock guard.
//!
//! Blocks cart growth past what inventory reports, but makes no
//! consistency promise: stock can change between this check and
//! settlement, so the orchestrator re-validates authoritatively.

use std::{fmt, sync::Arc};

use kaha::Cart;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::store::CheckoutStore;

/// A guard rejection; the cart is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not enough stock for product {product}: {available} available, {in_cart} already in cart")]
pub struct GuardRejection {
    pub product: Uuid,
    pub available: u32,
    pub in_cart: u32,
}

/// Advisory, fail-closed inventory check.
#[derive(Clone)]
pub struct StockGuard {
    store: Arc<dyn CheckoutStore>,
}

impl StockGuard {
    #[must_use]
    pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
        Self { store }
    }

    /// Units currently available for a product. Any query failure is
    /// treated as zero stock; the guard never fails open.
    pub async fn check_available(&self, product: Uuid) -> u32 {
        match self.store.inventory_level(product).await {
            Ok(level) => level.quantity_in_stock,
            Err(error) => {
                warn!(%product, %error, "stock query failed; treating as out of stock");
                0
            }
        }
    }

    /// Decides whether `increase` more units of a product may join the
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns [`GuardRejection`] when available stock does not cover
    /// what the cart already holds plus the requested increase.
    pub async fn allow_increase(
        &self,
        cart: &Cart,
        product: Uuid,
        increase: u32,
    ) -> Result<(), GuardRejection> {
        let in_cart = cart.quantity_of(product);
        let available = self.check_available(product).await;

        if u64::from(available) < u64::from(in_cart) + u64::from(increase) {
            return Err(GuardRejection {
                product,
                available,
                in_cart,
            });
        }

        Ok(())
    }
}

impl fmt::Debug for StockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockGuard").finish_non_exhaustive()
    }
}
