//! Cash payment flow.

use jiff::Timestamp;
use thiserror::Error;

use crate::money::{self, AmountParseError, Centavos};

use super::{PaymentData, PaymentDescriptor, PaymentMethod, transaction_reference};

/// Why a cash payment was rejected. The cart is untouched either way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CashPaymentError {
    /// The tendered input did not parse to a positive amount.
    #[error(transparent)]
    InvalidAmount(#[from] AmountParseError),

    /// Tendered less than the total due.
    #[error("insufficient amount: received {} against a total of {}",
        money::format_centavos(*tendered),
        money::format_centavos(*total))]
    InsufficientAmount {
        /// What the customer handed over.
        tendered: Centavos,

        /// What the order costs.
        total: Centavos,
    },
}

/// A cash payment pending for a known total.
#[derive(Debug, Clone, Copy)]
pub struct CashPayment {
    total: Centavos,
}

impl CashPayment {
    /// Starts a cash flow for the given total due.
    #[must_use]
    pub fn new(total: Centavos) -> Self {
        Self { total }
    }

    /// Completes the flow with the operator-entered tendered amount.
    ///
    /// # Errors
    ///
    /// Rejects malformed input and amounts below the total; no
    /// descriptor is produced on rejection.
    pub fn settle(&self, tendered_input: &str, at: Timestamp) -> Result<PaymentDescriptor, CashPaymentError> {
        let tendered = money::parse_amount(tendered_input)?;

        if tendered < self.total {
            return Err(CashPaymentError::InsufficientAmount {
                tendered,
                total: self.total,
            });
        }

        let change = tendered - self.total;

        Ok(PaymentDescriptor {
            method: PaymentMethod::Cash,
            data: PaymentData::Cash { tendered, change },
            transaction_reference: transaction_reference(PaymentMethod::Cash, at),
            amount_paid: self.total,
            paid_at: at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_or_greater_tender_yields_change() {
        let flow = CashPayment::new(20_800);

        let descriptor = flow.settle("250.00", Timestamp::UNIX_EPOCH).unwrap();

        assert_eq!(descriptor.method, PaymentMethod::Cash);
        assert_eq!(descriptor.amount_paid, 20_800);
        assert_eq!(
            descriptor.data,
            PaymentData::Cash {
                tendered: 25_000,
                change: 4_200
            }
        );
        assert!(descriptor.transaction_reference.starts_with("CASH-"));
    }

    #[test]
    fn insufficient_tender_is_rejected_without_a_descriptor() {
        let flow = CashPayment::new(20_800);

        let result = flow.settle("150.00", Timestamp::UNIX_EPOCH);

        assert_eq!(
            result,
            Err(CashPaymentError::InsufficientAmount {
                tendered: 15_000,
                total: 20_800
            })
        );
    }

    #[test]
    fn malformed_tender_is_rejected() {
        let flow = CashPayment::new(20_800);

        assert!(matches!(
            flow.settle("", Timestamp::UNIX_EPOCH),
            Err(CashPaymentError::InvalidAmount(_))
        ));
        assert!(matches!(
            flow.settle("0", Timestamp::UNIX_EPOCH),
            Err(CashPaymentError::InvalidAmount(AmountParseError::NotPositive))
        ));
    }
}
