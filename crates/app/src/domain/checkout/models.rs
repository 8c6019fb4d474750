//! Checkout and settlement models.

use std::fmt;

use jiff::Timestamp;
use kaha::{
    Centavos, Receipt,
    cart::CartLine,
    payment::{PaymentData, PaymentDescriptor, PaymentMethod},
};
use uuid::Uuid;

/// Order id assigned by the datastore.
pub type OrderId = i64;

/// Persisted order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Persistence label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Persisted payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Persistence label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Order header to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub total_amount: Centavos,
    pub status: OrderStatus,

    /// Carries the order type (Dine In / Take Out).
    pub notes: String,

    pub cashier_name: Option<String>,
    pub placed_at: Timestamp,
}

/// One persisted line item; immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub product_uuid: Uuid,
    pub quantity: u32,
    pub unit_price: Centavos,
    pub subtotal: Centavos,
}

impl From<&CartLine> for NewLineItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_uuid: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.line_total(),
        }
    }
}

/// Payment row to persist; exactly one per order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount_paid: Centavos,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_reference: String,
    pub card_last4: Option<String>,
    pub cardholder_name: Option<String>,
    pub paid_at: Timestamp,
}

impl From<&PaymentDescriptor> for NewPayment {
    fn from(descriptor: &PaymentDescriptor) -> Self {
        let (card_last4, cardholder_name) = match &descriptor.data {
            PaymentData::Card { last4, holder_name } => {
                (Some(last4.clone()), Some(holder_name.clone()))
            }
            PaymentData::Cash { .. } | PaymentData::External { .. } => (None, None),
        };

        Self {
            amount_paid: descriptor.amount_paid,
            method: descriptor.method,
            status: PaymentStatus::Completed,
            transaction_reference: descriptor.transaction_reference.clone(),
            card_last4,
            cardholder_name,
            paid_at: descriptor.paid_at,
        }
    }
}

/// Current stock for a product as seen by checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity_in_stock: u32,
    pub minimum_threshold: u32,
}

/// Where a settlement attempt was when it succeeded or failed.
///
/// One attempt moves through these stages in order; `Settled` and any
/// failure are terminal. A new attempt always starts fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStage {
    Validating,
    CreatingOrder,
    WritingItems,
    RecordingPayment,
    UpdatingInventory,
}

impl SettlementStage {
    /// Human-readable stage description used in error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Validating => "validating stock",
            Self::CreatingOrder => "creating the order header",
            Self::WritingItems => "writing line items",
            Self::RecordingPayment => "recording the payment",
            Self::UpdatingInventory => "updating inventory",
        }
    }
}

impl fmt::Display for SettlementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// The result of a successful settlement.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// Datastore-assigned order id.
    pub order_id: OrderId,

    /// Receipt-ready data.
    pub receipt: Receipt,

    /// Products whose inventory decrement did not apply; non-fatal but
    /// requires operator attention.
    pub stock_warnings: Vec<Uuid>,
}
