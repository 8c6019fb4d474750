//! Payment methods and the descriptor a completed flow produces.
//!
//! A flow either yields a [`PaymentDescriptor`] or is cancelled with no
//! side effects. The descriptor is a value: settlement consumes it
//! exactly once and it is never mutated afterward.

use jiff::Timestamp;
use serde::Serialize;

use crate::money::Centavos;

pub mod card;
pub mod cash;

pub use card::{CardDetails, CardFieldErrors, CardForm, CardValidationError};
pub use cash::{CashPayment, CashPaymentError};

/// Persisted payment-method vocabulary.
///
/// A closed set; anything unrecognized normalizes to [`Self::Other`]
/// rather than failing settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    /// Cash over the counter.
    Cash,

    /// Credit or debit card.
    Card,

    /// Mobile wallet (GCash).
    Wallet,

    /// Third-party redirect (PayPal).
    ThirdParty,

    /// Catch-all bucket for unrecognized method strings.
    Other,
}

impl PaymentMethod {
    /// Display and persistence label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Credit Card",
            Self::Wallet => "GCash",
            Self::ThirdParty => "PayPal",
            Self::Other => "Other",
        }
    }

    /// Maps a stored or external method string onto the closed
    /// vocabulary. Unrecognized strings coerce to [`Self::Other`].
    #[must_use]
    pub fn normalize(label: &str) -> Self {
        match label.trim() {
            "Cash" => Self::Cash,
            "Credit Card" | "Card" => Self::Card,
            "GCash" => Self::Wallet,
            "PayPal" => Self::ThirdParty,
            _ => Self::Other,
        }
    }

    /// Prefix used when fabricating a transaction reference.
    #[must_use]
    pub fn reference_prefix(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CC",
            Self::Wallet => "GC",
            Self::ThirdParty => "PP",
            Self::Other => "TX",
        }
    }
}

/// Fabricates a `{PREFIX}-{unix-millis}` transaction reference.
///
/// Simulated flows only; a real gateway integration supplies its own
/// reference through the gateway seam.
#[must_use]
pub fn transaction_reference(method: PaymentMethod, at: Timestamp) -> String {
    format!("{}-{}", method.reference_prefix(), at.as_millisecond())
}

/// Method-specific settlement data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PaymentData {
    /// Cash: what was handed over and what goes back.
    Cash {
        /// Amount tendered in centavos.
        tendered: Centavos,

        /// Change owed in centavos.
        change: Centavos,
    },

    /// Card: only non-sensitive details are retained.
    Card {
        /// Last four digits of the card number.
        last4: String,

        /// Cardholder name as entered.
        holder_name: String,
    },

    /// Wallet or third-party: the external transaction id.
    External {
        /// Reference issued by the (simulated) gateway.
        external_reference: String,
    },
}

/// The value produced by a completed payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDescriptor {
    /// Which method settled the order.
    pub method: PaymentMethod,

    /// Method-specific fields.
    pub data: PaymentData,

    /// Universal transaction reference.
    pub transaction_reference: String,

    /// Amount actually applied to the order, in centavos.
    pub amount_paid: Centavos,

    /// When the flow completed.
    pub paid_at: Timestamp,
}

impl PaymentDescriptor {
    /// Descriptor for a completed wallet payment.
    #[must_use]
    pub fn wallet(amount_paid: Centavos, external_reference: String, paid_at: Timestamp) -> Self {
        Self {
            method: PaymentMethod::Wallet,
            data: PaymentData::External {
                external_reference: external_reference.clone(),
            },
            transaction_reference: external_reference,
            amount_paid,
            paid_at,
        }
    }

    /// Descriptor for a completed third-party payment.
    #[must_use]
    pub fn third_party(
        amount_paid: Centavos,
        external_reference: String,
        paid_at: Timestamp,
    ) -> Self {
        Self {
            method: PaymentMethod::ThirdParty,
            data: PaymentData::External {
                external_reference: external_reference.clone(),
            },
            transaction_reference: external_reference,
            amount_paid,
            paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_method_labels() {
        assert_eq!(PaymentMethod::normalize("Cash"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::normalize("Credit Card"), PaymentMethod::Card);
        assert_eq!(PaymentMethod::normalize("GCash"), PaymentMethod::Wallet);
        assert_eq!(PaymentMethod::normalize("PayPal"), PaymentMethod::ThirdParty);
    }

    #[test]
    fn unknown_method_labels_coerce_to_other() {
        assert_eq!(PaymentMethod::normalize("Bitcoin"), PaymentMethod::Other);
        assert_eq!(PaymentMethod::normalize(""), PaymentMethod::Other);
    }

    #[test]
    fn references_carry_the_method_prefix() {
        let at = Timestamp::UNIX_EPOCH;

        let reference = transaction_reference(PaymentMethod::Wallet, at);

        assert_eq!(reference, "GC-0");
    }
}
