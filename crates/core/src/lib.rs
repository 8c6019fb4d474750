//! Pure checkout engine for the Kaha point-of-sale.
//!
//! Carts, totals, payment flows, and receipts as plain values — no I/O,
//! no async, no database types. Persistence and settlement live in
//! `kaha-app`.

pub mod cart;
pub mod fixtures;
pub mod money;
pub mod payment;
pub mod receipt;

pub use cart::{Cart, CartLine, CartTotals, FlatFeeTax, OrderType, QuantityChange, TaxPolicy};
pub use money::Centavos;
pub use payment::{PaymentData, PaymentDescriptor, PaymentMethod};
pub use receipt::Receipt;
