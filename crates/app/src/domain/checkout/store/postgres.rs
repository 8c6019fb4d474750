//! PostgreSQL checkout store.
//!
//! The stepwise operations each run a single statement; the preferred
//! atomic path delegates to the `settle_order` server-side function so
//! steps 2–5 commit or roll back together.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{PgPool, query, query_scalar};
use uuid::Uuid;

use crate::domain::{
    checkout::{
        errors::StoreError,
        models::{NewLineItem, NewOrder, NewPayment, OrderId, StockLevel},
    },
    try_get_count,
};

use super::CheckoutStore;

const STOCK_LEVEL_SQL: &str = include_str!("sql/stock_level.sql");
const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_LINE_ITEMS_SQL: &str = include_str!("sql/insert_line_items.sql");
const INSERT_PAYMENT_SQL: &str = include_str!("sql/insert_payment.sql");
const DECREMENT_INVENTORY_SQL: &str = include_str!("sql/decrement_inventory.sql");
const SETTLE_ORDER_SQL: &str = include_str!("sql/settle_order.sql");

/// SQLSTATE raised by `settle_order` when a conditional decrement
/// affects no row.
const INSUFFICIENT_STOCK_SQLSTATE: &str = "KH001";

#[derive(Debug, Clone)]
pub struct PgCheckoutStore {
    pool: PgPool,
}

impl PgCheckoutStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn inventory_level(&self, product: Uuid) -> Result<StockLevel, StoreError> {
        let row = query(STOCK_LEVEL_SQL)
            .bind(product)
            .fetch_one(&self.pool)
            .await?;

        Ok(StockLevel {
            quantity_in_stock: try_get_count(&row, "quantity_in_stock")?,
            minimum_threshold: try_get_count(&row, "minimum_threshold")?,
        })
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let order_id: OrderId = query_scalar(INSERT_ORDER_SQL)
            .bind(&order.customer_name)
            .bind(i64::try_from(order.total_amount)?)
            .bind(SqlxTimestamp::from(order.placed_at))
            .bind(order.status.as_str())
            .bind(&order.notes)
            .bind(&order.cashier_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(order_id)
    }

    async fn insert_line_items(
        &self,
        order: OrderId,
        lines: &[NewLineItem],
    ) -> Result<(), StoreError> {
        let (products, quantities, unit_prices, subtotals) = line_arrays(lines)?;

        query(INSERT_LINE_ITEMS_SQL)
            .bind(order)
            .bind(products)
            .bind(quantities)
            .bind(unit_prices)
            .bind(subtotals)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_payment(&self, order: OrderId, payment: NewPayment) -> Result<(), StoreError> {
        query(INSERT_PAYMENT_SQL)
            .bind(order)
            .bind(SqlxTimestamp::from(payment.paid_at))
            .bind(i64::try_from(payment.amount_paid)?)
            .bind(payment.method.as_str())
            .bind(payment.status.as_str())
            .bind(&payment.transaction_reference)
            .bind(&payment.card_last4)
            .bind(&payment.cardholder_name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn decrement_inventory(&self, product: Uuid, quantity: u32) -> Result<bool, StoreError> {
        let rows_affected = query(DECREMENT_INVENTORY_SQL)
            .bind(product)
            .bind(i32::try_from(quantity)?)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn settle_order(
        &self,
        order: NewOrder,
        lines: &[NewLineItem],
        payment: NewPayment,
    ) -> Result<OrderId, StoreError> {
        let (products, quantities, unit_prices, subtotals) = line_arrays(lines)?;

        let result: Result<OrderId, sqlx::Error> = query_scalar(SETTLE_ORDER_SQL)
            .bind(&order.customer_name)
            .bind(i64::try_from(order.total_amount)?)
            .bind(SqlxTimestamp::from(order.placed_at))
            .bind(order.status.as_str())
            .bind(&order.notes)
            .bind(&order.cashier_name)
            .bind(products)
            .bind(quantities)
            .bind(unit_prices)
            .bind(subtotals)
            .bind(SqlxTimestamp::from(payment.paid_at))
            .bind(i64::try_from(payment.amount_paid)?)
            .bind(payment.method.as_str())
            .bind(payment.status.as_str())
            .bind(&payment.transaction_reference)
            .bind(&payment.card_last4)
            .bind(&payment.cardholder_name)
            .fetch_one(&self.pool)
            .await;

        result.map_err(map_settle_error)
    }
}

/// Unzips line items into the parallel arrays the batch SQL expects.
fn line_arrays(
    lines: &[NewLineItem],
) -> Result<(Vec<Uuid>, Vec<i32>, Vec<i64>, Vec<i64>), StoreError> {
    let mut products = Vec::with_capacity(lines.len());
    let mut quantities = Vec::with_capacity(lines.len());
    let mut unit_prices = Vec::with_capacity(lines.len());
    let mut subtotals = Vec::with_capacity(lines.len());

    for line in lines {
        products.push(line.product_uuid);
        quantities.push(i32::try_from(line.quantity)?);
        unit_prices.push(i64::try_from(line.unit_price)?);
        subtotals.push(i64::try_from(line.subtotal)?);
    }

    Ok((products, quantities, unit_prices, subtotals))
}

fn map_settle_error(error: sqlx::Error) -> StoreError {
    if let Some(db_error) = error.as_database_error() {
        if db_error.code().as_deref() == Some(INSUFFICIENT_STOCK_SQLSTATE) {
            // The function reports the offending product uuid as the
            // last token of its message.
            let product = db_error
                .message()
                .rsplit(' ')
                .next()
                .and_then(|token| token.parse().ok())
                .unwrap_or_else(Uuid::nil);

            return StoreError::InsufficientStock { product };
        }
    }

    StoreError::from(error)
}