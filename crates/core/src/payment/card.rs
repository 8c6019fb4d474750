//! Card payment flow with field-level validation.
//!
//! Validation matches the observed behavior: 16 digits after stripping
//! separators, `MM/YY` shape, 3-digit CVV, non-empty holder name. The
//! expiry is a format check only; month range and past dates are not
//! validated, and no Luhn check is performed.

use jiff::Timestamp;
use thiserror::Error;

use crate::money::Centavos;

use super::{PaymentData, PaymentDescriptor, PaymentMethod, transaction_reference};

/// Raw card form input as entered by the operator.
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    /// Card number, separators allowed.
    pub number: String,

    /// Expiry in `MM/YY`.
    pub expiry: String,

    /// Card verification value.
    pub cvv: String,

    /// Cardholder name.
    pub holder_name: String,
}

/// Per-field validation messages. A field is `None` when valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFieldErrors {
    /// Problem with the card number, if any.
    pub number: Option<&'static str>,

    /// Problem with the expiry, if any.
    pub expiry: Option<&'static str>,

    /// Problem with the CVV, if any.
    pub cvv: Option<&'static str>,

    /// Problem with the holder name, if any.
    pub holder_name: Option<&'static str>,
}

impl CardFieldErrors {
    /// True when every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.expiry.is_none()
            && self.cvv.is_none()
            && self.holder_name.is_none()
    }
}

/// The form failed validation; no descriptor was produced.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("card details failed validation")]
pub struct CardValidationError(pub CardFieldErrors);

/// Validated, non-sensitive card details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    /// Last four digits of the card number.
    pub last4: String,

    /// Cardholder name.
    pub holder_name: String,
}

impl CardForm {
    /// Validates every field and returns the retained details.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once; submission is blocked on any
    /// failure and no partial descriptor is ever produced.
    pub fn validate(&self) -> Result<CardDetails, CardValidationError> {
        let mut errors = CardFieldErrors::default();

        let digits: String = self
            .number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            errors.number = Some("Card number must be 16 digits");
        }

        if !is_expiry_shape(&self.expiry) {
            errors.expiry = Some("Expiry must be MM/YY");
        }

        if self.cvv.len() != 3 || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            errors.cvv = Some("CVV must be 3 digits");
        }

        if self.holder_name.trim().is_empty() {
            errors.holder_name = Some("Cardholder name is required");
        }

        if !errors.is_empty() {
            return Err(CardValidationError(errors));
        }

        let last4 = digits.chars().skip(12).collect();

        Ok(CardDetails {
            last4,
            holder_name: self.holder_name.trim().to_string(),
        })
    }

    /// Validates the form and completes the flow for the given total.
    ///
    /// # Errors
    ///
    /// Propagates [`CardValidationError`] from [`Self::validate`].
    pub fn settle(&self, total: Centavos, at: Timestamp) -> Result<PaymentDescriptor, CardValidationError> {
        let details = self.validate()?;

        Ok(PaymentDescriptor {
            method: PaymentMethod::Card,
            data: PaymentData::Card {
                last4: details.last4,
                holder_name: details.holder_name,
            },
            transaction_reference: transaction_reference(PaymentMethod::Card, at),
            amount_paid: total,
            paid_at: at,
        })
    }
}

/// `MM/YY`: five characters, digits around a slash. Month range and
/// past dates are deliberately not checked.
fn is_expiry_shape(expiry: &str) -> bool {
    let mut chars = expiry.chars();

    let shape_ok = matches!(
        (chars.next(), chars.next(), chars.next(), chars.next(), chars.next()),
        (Some(m1), Some(m2), Some('/'), Some(y1), Some(y2))
            if m1.is_ascii_digit() && m2.is_ascii_digit() && y1.is_ascii_digit() && y2.is_ascii_digit()
    );

    shape_ok && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CardForm {
        CardForm {
            number: "4111 1111 1111 1234".to_string(),
            expiry: "09/27".to_string(),
            cvv: "123".to_string(),
            holder_name: "CATHERINE ARNADO".to_string(),
        }
    }

    #[test]
    fn valid_form_settles_with_last4() {
        let descriptor = valid_form().settle(20_800, Timestamp::UNIX_EPOCH).unwrap();

        assert_eq!(descriptor.method, PaymentMethod::Card);
        assert_eq!(descriptor.amount_paid, 20_800);
        assert_eq!(
            descriptor.data,
            PaymentData::Card {
                last4: "1234".to_string(),
                holder_name: "CATHERINE ARNADO".to_string(),
            }
        );
        assert!(descriptor.transaction_reference.starts_with("CC-"));
    }

    #[test]
    fn every_invalid_field_is_reported_at_once() {
        let form = CardForm {
            number: "4111".to_string(),
            expiry: "9/27".to_string(),
            cvv: "12".to_string(),
            holder_name: "  ".to_string(),
        };

        let error = form.validate().unwrap_err();

        assert_eq!(error.0.number, Some("Card number must be 16 digits"));
        assert_eq!(error.0.expiry, Some("Expiry must be MM/YY"));
        assert_eq!(error.0.cvv, Some("CVV must be 3 digits"));
        assert_eq!(error.0.holder_name, Some("Cardholder name is required"));
    }

    #[test]
    fn separators_are_stripped_before_the_digit_count() {
        let mut form = valid_form();
        form.number = "4111-1111-1111-1234".to_string();

        assert!(form.validate().is_ok());
    }

    #[test]
    fn expiry_is_a_format_check_only() {
        // Month 13 and an in-the-past year both pass; observed gap.
        let mut form = valid_form();
        form.expiry = "13/01".to_string();

        assert!(form.validate().is_ok());
    }

    #[test]
    fn non_digit_card_number_is_rejected() {
        let mut form = valid_form();
        form.number = "4111 1111 1111 12ab".to_string();

        let error = form.validate().unwrap_err();

        assert_eq!(error.0.number, Some("Card number must be 16 digits"));
        assert!(error.0.expiry.is_none());
    }
}
