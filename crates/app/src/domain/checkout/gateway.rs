//! Payment gateway seam for wallet and third-party flows.
//!
//! The simulated implementation stands in for GCash/PayPal: it waits a
//! configurable moment, then always confirms with a fabricated
//! transaction reference. A real integration implements
//! [`PaymentGateway`] and slots in without touching settlement.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use kaha::{
    Centavos,
    payment::{PaymentDescriptor, PaymentMethod, transaction_reference},
};
use mockall::automock;
use thiserror::Error;

/// Gateway-side outcome of an authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAuthorization {
    /// Reference issued by the gateway.
    pub transaction_reference: String,

    /// When the gateway confirmed.
    pub authorized_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The customer closed the flow; the cart must be left untouched.
    #[error("payment cancelled")]
    Cancelled,

    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Runs the external flow for the given amount and method.
    async fn authorize(
        &self,
        method: PaymentMethod,
        amount: Centavos,
    ) -> Result<GatewayAuthorization, GatewayError>;
}

/// Always-confirming stand-in gateway.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Simulated confirmation delay matching the observed flows.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
        }
    }

    /// Overrides the artificial delay; tests use zero.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(
        &self,
        method: PaymentMethod,
        _amount: Centavos,
    ) -> Result<GatewayAuthorization, GatewayError> {
        tokio::time::sleep(self.delay).await;

        let authorized_at = Timestamp::now();

        Ok(GatewayAuthorization {
            transaction_reference: transaction_reference(method, authorized_at),
            authorized_at,
        })
    }
}

/// Completes a wallet (GCash) payment through the gateway.
///
/// # Errors
///
/// Propagates gateway cancellation or unavailability; no descriptor is
/// produced and the cart is untouched.
pub async fn wallet_payment(
    gateway: &dyn PaymentGateway,
    total: Centavos,
) -> Result<PaymentDescriptor, GatewayError> {
    let auth = gateway.authorize(PaymentMethod::Wallet, total).await?;

    Ok(PaymentDescriptor::wallet(
        total,
        auth.transaction_reference,
        auth.authorized_at,
    ))
}

/// Completes a third-party (PayPal) payment through the gateway.
///
/// # Errors
///
/// Propagates gateway cancellation or unavailability; no descriptor is
/// produced and the cart is untouched.
pub async fn third_party_payment(
    gateway: &dyn PaymentGateway,
    total: Centavos,
) -> Result<PaymentDescriptor, GatewayError> {
    let auth = gateway.authorize(PaymentMethod::ThirdParty, total).await?;

    Ok(PaymentDescriptor::third_party(
        total,
        auth.transaction_reference,
        auth.authorized_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_wallet_flow_confirms_with_a_gc_reference() {
        let gateway = SimulatedGateway::with_delay(Duration::ZERO);

        let descriptor = wallet_payment(&gateway, 20_800).await.unwrap();

        assert_eq!(descriptor.method, PaymentMethod::Wallet);
        assert_eq!(descriptor.amount_paid, 20_800);
        assert!(descriptor.transaction_reference.starts_with("GC-"));
    }

    #[tokio::test]
    async fn simulated_third_party_flow_confirms_with_a_pp_reference() {
        let gateway = SimulatedGateway::with_delay(Duration::ZERO);

        let descriptor = third_party_payment(&gateway, 9_600).await.unwrap();

        assert_eq!(descriptor.method, PaymentMethod::ThirdParty);
        assert!(descriptor.transaction_reference.starts_with("PP-"));
    }

    #[tokio::test]
    async fn cancellation_produces_no_descriptor() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_authorize()
            .returning(|_, _| Err(GatewayError::Cancelled));

        let result = wallet_payment(&gateway, 20_800).await;

        assert!(matches!(result, Err(GatewayError::Cancelled)));
    }
}
