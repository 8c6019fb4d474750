//! Checkout and settlement errors.

use std::num::TryFromIntError;

use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use super::models::{OrderId, SettlementStage};

/// Errors surfaced by a [`super::CheckoutStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("duplicate record")]
    Duplicate,

    /// Raised by the atomic settlement path when stock ran out between
    /// validation and commit.
    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: Uuid },

    #[error("storage error")]
    Sql(#[source] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("value out of range")]
    OutOfRange(#[from] TryFromIntError),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Duplicate,
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(_) | None => Self::Sql(error),
        }
    }
}

/// Why a settlement attempt failed.
///
/// Failures before the order header commits are clean: nothing was
/// written and the attempt may be retried from scratch. Failures after
/// it are [`Self::PartialInconsistency`] and must never be auto-retried.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Local validation failure; no datastore call was made.
    #[error("cannot settle an empty cart")]
    EmptyCart,

    /// The authoritative stock re-check failed for a line.
    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    StockUnavailable {
        product: Uuid,
        requested: u32,
        available: u32,
    },

    /// A datastore call failed before anything durable was written.
    /// Safe to retry the whole attempt.
    #[error("settlement failed while {stage}")]
    Store {
        stage: SettlementStage,
        #[source]
        source: StoreError,
    },

    /// The order header exists but a later step failed. The orphaned
    /// order id is included so an operator can reconcile; retrying
    /// would duplicate the order.
    #[error("order {order_id} was created but settlement failed while {stage}; operator reconciliation required")]
    PartialInconsistency {
        order_id: OrderId,
        stage: SettlementStage,
        #[source]
        source: StoreError,
    },
}

impl SettlementError {
    /// Whether re-running the attempt from scratch is safe.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::PartialInconsistency { .. })
    }
}
