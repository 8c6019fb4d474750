//! Settlement orchestration.
//!
//! [`SettlementOrchestrator::settle`] turns a paid-for cart into durable
//! order, line-item, payment, and inventory writes. The atomic mode
//! pushes all four writes into one server-side transaction; the stepwise
//! mode drives them individually and reports exactly how far it got when
//! a step fails.

use std::sync::Arc;

use kaha::{Receipt, payment::PaymentDescriptor};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    errors::{SettlementError, StoreError},
    models::{
        NewLineItem, NewOrder, NewPayment, OrderId, OrderStatus, SettlementOutcome,
        SettlementStage,
    },
    session::CheckoutSession,
    store::CheckoutStore,
};

/// How the datastore writes are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlementMode {
    /// One server-side transaction; all writes commit or none do.
    #[default]
    Atomic,

    /// Individual writes in a fixed order. Only for stores without
    /// server-side transactions; a mid-sequence failure leaves a
    /// partial order that needs operator reconciliation.
    Stepwise,
}

/// Drives settlement against a [`CheckoutStore`].
pub struct SettlementOrchestrator {
    store: Arc<dyn CheckoutStore>,
    mode: SettlementMode,
}

impl SettlementOrchestrator {
    /// An orchestrator in the default atomic mode.
    #[must_use]
    pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
        Self::with_mode(store, SettlementMode::default())
    }

    #[must_use]
    pub fn with_mode(store: Arc<dyn CheckoutStore>, mode: SettlementMode) -> Self {
        Self { store, mode }
    }

    /// Settles the session's cart with an already-completed payment.
    ///
    /// On success the cart is cleared and the session's order number
    /// advances. On any failure the cart is left intact so the cashier
    /// can retry or adjust.
    ///
    /// # Errors
    ///
    /// [`SettlementError::EmptyCart`] when there is nothing to settle,
    /// [`SettlementError::StockUnavailable`] when the authoritative
    /// stock re-check fails, [`SettlementError::Store`] when a write
    /// fails before anything durable exists, and
    /// [`SettlementError::PartialInconsistency`] when a stepwise write
    /// fails after the order header committed.
    pub async fn settle(
        &self,
        session: &mut CheckoutSession,
        descriptor: PaymentDescriptor,
    ) -> Result<SettlementOutcome, SettlementError> {
        let cart = session.cart();

        if cart.is_empty() {
            return Err(SettlementError::EmptyCart);
        }

        let totals = session.totals();
        let lines: Vec<NewLineItem> = cart.lines().iter().map(NewLineItem::from).collect();

        self.revalidate_stock(&lines).await?;

        let order = NewOrder {
            customer_name: cart.customer_name.clone(),
            total_amount: totals.total,
            status: OrderStatus::Completed,
            notes: cart.order_type.as_str().to_owned(),
            cashier_name: None,
            placed_at: descriptor.paid_at,
        };
        let payment = NewPayment::from(&descriptor);

        let (order_id, stock_warnings) = match self.mode {
            SettlementMode::Atomic => (self.settle_atomic(order, &lines, payment).await?, Vec::new()),
            SettlementMode::Stepwise => self.settle_stepwise(order, &lines, payment).await?,
        };

        let receipt = Receipt {
            order_number: session.order_number(),
            customer_name: cart.customer_name.clone(),
            order_type: cart.order_type,
            lines: cart.lines().to_vec(),
            totals,
            method: descriptor.method,
            transaction_reference: descriptor.transaction_reference,
            issued_at: descriptor.paid_at,
        };

        session.on_settled();

        info!(
            order_id,
            order_number = receipt.order_number,
            total = totals.total,
            method = receipt.method.as_str(),
            "order settled"
        );

        Ok(SettlementOutcome {
            order_id,
            receipt,
            stock_warnings,
        })
    }

    /// Re-checks every line against authoritative stock just before the
    /// writes. A missing inventory record counts as zero.
    async fn revalidate_stock(&self, lines: &[NewLineItem]) -> Result<(), SettlementError> {
        for line in lines {
            let available = match self.store.inventory_level(line.product_uuid).await {
                Ok(level) => level.quantity_in_stock,
                Err(StoreError::NotFound) => 0,
                Err(source) => {
                    return Err(SettlementError::Store {
                        stage: SettlementStage::Validating,
                        source,
                    });
                }
            };

            if available < line.quantity {
                return Err(SettlementError::StockUnavailable {
                    product: line.product_uuid,
                    requested: line.quantity,
                    available,
                });
            }
        }

        Ok(())
    }

    async fn settle_atomic(
        &self,
        order: NewOrder,
        lines: &[NewLineItem],
        payment: NewPayment,
    ) -> Result<OrderId, SettlementError> {
        match self.store.settle_order(order, lines, payment).await {
            Ok(order_id) => Ok(order_id),
            Err(StoreError::InsufficientStock { product }) => {
                Err(self.stock_shortfall(lines, product).await)
            }
            Err(source) => Err(SettlementError::Store {
                stage: SettlementStage::CreatingOrder,
                source,
            }),
        }
    }

    /// Builds the [`SettlementError::StockUnavailable`] for a shortfall
    /// the transaction detected; the re-query is best effort.
    async fn stock_shortfall(&self, lines: &[NewLineItem], product: Uuid) -> SettlementError {
        let requested = lines
            .iter()
            .find(|line| line.product_uuid == product)
            .map_or(0, |line| line.quantity);

        let available = self
            .store
            .inventory_level(product)
            .await
            .map_or(0, |level| level.quantity_in_stock);

        SettlementError::StockUnavailable {
            product,
            requested,
            available,
        }
    }

    async fn settle_stepwise(
        &self,
        order: NewOrder,
        lines: &[NewLineItem],
        payment: NewPayment,
    ) -> Result<(OrderId, Vec<Uuid>), SettlementError> {
        let order_id =
            self.store
                .insert_order(order)
                .await
                .map_err(|source| SettlementError::Store {
                    stage: SettlementStage::CreatingOrder,
                    source,
                })?;

        self.store
            .insert_line_items(order_id, lines)
            .await
            .map_err(|source| SettlementError::PartialInconsistency {
                order_id,
                stage: SettlementStage::WritingItems,
                source,
            })?;

        self.store
            .insert_payment(order_id, payment)
            .await
            .map_err(|source| SettlementError::PartialInconsistency {
                order_id,
                stage: SettlementStage::RecordingPayment,
                source,
            })?;

        // Inventory decrements are best effort here: the order and
        // payment are already durable, so a miss is reported rather
        // than failing a paid-for order.
        let mut stock_warnings = Vec::new();

        for line in lines {
            let applied = match self
                .store
                .decrement_inventory(line.product_uuid, line.quantity)
                .await
            {
                Ok(applied) => applied,
                Err(error) => {
                    warn!(
                        order_id,
                        product = %line.product_uuid,
                        %error,
                        "inventory decrement failed"
                    );
                    false
                }
            };

            if !applied {
                warn!(
                    order_id,
                    product = %line.product_uuid,
                    quantity = line.quantity,
                    "inventory decrement did not apply"
                );
                stock_warnings.push(line.product_uuid);
            }
        }

        Ok((order_id, stock_warnings))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use kaha::{
        QuantityChange,
        payment::{PaymentData, PaymentMethod},
    };
    use testresult::TestResult;

    use crate::domain::{
        catalog::models::Product,
        checkout::{
            models::StockLevel,
            session::FIRST_ORDER_NUMBER,
            store::{MemoryCheckoutStore, MockCheckoutStore},
        },
    };

    use super::*;

    fn product(name: &str, price: u64) -> Product {
        let now = Timestamp::now();

        Product {
            uuid: Uuid::now_v7(),
            name: name.to_owned(),
            category: "Sandwiches".to_owned(),
            price,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn cash_descriptor(amount: u64) -> PaymentDescriptor {
        PaymentDescriptor {
            method: PaymentMethod::Cash,
            data: PaymentData::Cash {
                tendered: amount,
                change: 0,
            },
            transaction_reference: "CASH-1700000000000".to_owned(),
            amount_paid: amount,
            paid_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn settling_an_empty_cart_touches_no_store() {
        // No expectations registered, so any store call would panic.
        let store = Arc::new(MockCheckoutStore::new());
        let orchestrator = SettlementOrchestrator::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        let mut session = CheckoutSession::new(store);

        let result = orchestrator.settle(&mut session, cash_descriptor(0)).await;

        assert!(matches!(result, Err(SettlementError::EmptyCart)));
    }

    #[tokio::test]
    async fn line_item_failure_reports_the_orphaned_order() -> TestResult {
        let mut store = MockCheckoutStore::new();
        store.expect_inventory_level().returning(|_| {
            Ok(StockLevel {
                quantity_in_stock: 50,
                minimum_threshold: 10,
            })
        });
        store.expect_insert_order().returning(|_| Ok(7));
        store
            .expect_insert_line_items()
            .returning(|_, _| Err(StoreError::Unavailable("connection reset".to_owned())));
        store.expect_insert_payment().never();
        store.expect_decrement_inventory().never();

        let store = Arc::new(store);
        let orchestrator = SettlementOrchestrator::with_mode(
            Arc::clone(&store) as Arc<dyn CheckoutStore>,
            SettlementMode::Stepwise,
        );
        let mut session = CheckoutSession::new(store);

        let burger = product("Minute Burger", 8_900);
        session.add_item(&burger).await?;

        let error = orchestrator
            .settle(&mut session, cash_descriptor(9_500))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SettlementError::PartialInconsistency {
                order_id: 7,
                stage: SettlementStage::WritingItems,
                ..
            }
        ));
        assert!(!error.is_retryable());

        // The cart stays intact for reconciliation or retry-by-hand.
        assert!(!session.cart().is_empty());
        assert_eq!(session.order_number(), FIRST_ORDER_NUMBER);

        Ok(())
    }

    #[tokio::test]
    async fn stepwise_settlement_writes_everything_and_resets_the_session() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let burger = product("Minute Burger", 8_900);
        let coffee = product("Kape Barako", 2_400);
        store.set_stock(burger.uuid, 10, 2);
        store.set_stock(coffee.uuid, 10, 2);

        let orchestrator = SettlementOrchestrator::with_mode(
            Arc::clone(&store) as Arc<dyn CheckoutStore>,
            SettlementMode::Stepwise,
        );
        let mut session = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        session.set_customer_name(Some("Catherine Arnado".to_owned()));
        session.add_item(&burger).await?;
        session.add_item(&burger).await?;
        session.add_item(&coffee).await?;

        let total = session.totals().total;
        let outcome = orchestrator
            .settle(&mut session, cash_descriptor(total))
            .await?;

        assert!(outcome.stock_warnings.is_empty());
        assert_eq!(outcome.receipt.order_number, FIRST_ORDER_NUMBER);
        assert_eq!(outcome.receipt.totals.total, total);
        assert_eq!(outcome.receipt.lines.len(), 2);

        assert_eq!(store.payments_for(outcome.order_id).len(), 1);
        assert_eq!(store.lines_for(outcome.order_id).len(), 2);
        assert_eq!(store.stock_of(burger.uuid), Some(8));
        assert_eq!(store.stock_of(coffee.uuid), Some(9));

        assert!(session.cart().is_empty());
        assert_eq!(session.order_number(), FIRST_ORDER_NUMBER + 1);

        Ok(())
    }

    #[tokio::test]
    async fn atomic_settlement_writes_everything_at_once() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let burger = product("Minute Burger", 8_900);
        store.set_stock(burger.uuid, 3, 1);

        let orchestrator =
            SettlementOrchestrator::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        let mut session = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        session.add_item(&burger).await?;

        let total = session.totals().total;
        let outcome = orchestrator
            .settle(&mut session, cash_descriptor(total))
            .await?;

        assert_eq!(store.order_count(), 1);
        assert_eq!(store.payments_for(outcome.order_id).len(), 1);
        assert_eq!(store.stock_of(burger.uuid), Some(2));
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn atomic_shortfall_surfaces_as_stock_unavailable() -> TestResult {
        let burger = product("Minute Burger", 8_900);
        let burger_uuid = burger.uuid;

        let mut store = MockCheckoutStore::new();
        store.expect_inventory_level().returning(|_| {
            Ok(StockLevel {
                quantity_in_stock: 1,
                minimum_threshold: 0,
            })
        });
        store
            .expect_settle_order()
            .returning(move |_, _, _| Err(StoreError::InsufficientStock {
                product: burger_uuid,
            }));

        let store = Arc::new(store);
        let orchestrator =
            SettlementOrchestrator::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        let mut session = CheckoutSession::new(store);
        session.add_item(&burger).await?;

        let error = orchestrator
            .settle(&mut session, cash_descriptor(9_500))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SettlementError::StockUnavailable {
                product,
                requested: 1,
                ..
            } if product == burger_uuid
        ));
        assert!(error.is_retryable());
        assert!(!session.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn the_last_unit_settles_exactly_once() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let burger = product("Minute Burger", 8_900);
        store.set_stock(burger.uuid, 1, 0);

        let orchestrator =
            SettlementOrchestrator::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);

        let mut first = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        let mut second = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        first.add_item(&burger).await?;
        second.add_item(&burger).await?;

        let won = orchestrator
            .settle(&mut first, cash_descriptor(9_500))
            .await;
        let lost = orchestrator
            .settle(&mut second, cash_descriptor(9_500))
            .await;

        assert!(won.is_ok());
        assert!(matches!(
            lost,
            Err(SettlementError::StockUnavailable { available: 0, .. })
        ));
        assert_eq!(store.stock_of(burger.uuid), Some(0));
        assert_eq!(store.order_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_decrements_apply_at_most_once() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let product_uuid = Uuid::now_v7();
        store.set_stock(product_uuid, 1, 0);

        let (left, right) = tokio::join!(
            store.decrement_inventory(product_uuid, 1),
            store.decrement_inventory(product_uuid, 1),
        );

        assert!(left? != right?);
        assert_eq!(store.stock_of(product_uuid), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn the_guard_blocks_adding_beyond_stock() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let burger = product("Minute Burger", 8_900);
        store.set_stock(burger.uuid, 1, 0);

        let mut session = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        session.add_item(&burger).await?;

        let rejection = session.add_item(&burger).await.unwrap_err();
        assert_eq!(rejection.available, 1);
        assert_eq!(rejection.in_cart, 1);

        let rejection = session.change_quantity(burger.uuid, 1).await.unwrap_err();
        assert_eq!(rejection.in_cart, 1);

        // Decreases are never blocked.
        session.change_quantity(burger.uuid, -1).await?;
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn the_guard_counts_the_whole_requested_increase() -> TestResult {
        let store = Arc::new(MemoryCheckoutStore::new());
        let burger = product("Minute Burger", 8_900);
        store.set_stock(burger.uuid, 3, 0);

        let mut session = CheckoutSession::new(Arc::clone(&store) as Arc<dyn CheckoutStore>);
        session.add_item(&burger).await?;

        // 1 in cart + 3 requested exceeds the 3 available.
        let rejection = session.change_quantity(burger.uuid, 3).await.unwrap_err();
        assert_eq!(rejection.available, 3);
        assert_eq!(rejection.in_cart, 1);

        assert_eq!(
            session.change_quantity(burger.uuid, 2).await?,
            QuantityChange::Updated(3)
        );

        Ok(())
    }

    #[tokio::test]
    async fn a_missed_decrement_is_reported_not_fatal() -> TestResult {
        let burger = product("Minute Burger", 8_900);
        let burger_uuid = burger.uuid;

        let mut store = MockCheckoutStore::new();
        store.expect_inventory_level().returning(|_| {
            Ok(StockLevel {
                quantity_in_stock: 5,
                minimum_threshold: 0,
            })
        });
        store.expect_insert_order().returning(|_| Ok(11));
        store.expect_insert_line_items().returning(|_, _| Ok(()));
        store.expect_insert_payment().returning(|_, _| Ok(()));
        store
            .expect_decrement_inventory()
            .returning(|_, _| Ok(false));

        let store = Arc::new(store);
        let orchestrator = SettlementOrchestrator::with_mode(
            Arc::clone(&store) as Arc<dyn CheckoutStore>,
            SettlementMode::Stepwise,
        );
        let mut session = CheckoutSession::new(store);
        session.add_item(&burger).await?;

        let outcome = orchestrator
            .settle(&mut session, cash_descriptor(9_500))
            .await?;

        assert_eq!(outcome.order_id, 11);
        assert_eq!(outcome.stock_warnings, vec![burger_uuid]);
        assert!(session.cart().is_empty());

        Ok(())
    }
}
