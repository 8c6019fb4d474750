//! The checkout workflow: cart session, stock guard, payment gateway,
//! and the settlement orchestrator.

pub mod errors;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod service;
pub mod session;
pub mod store;

pub use errors::{SettlementError, StoreError};
pub use gateway::{PaymentGateway, SimulatedGateway};
pub use guard::{GuardRejection, StockGuard};
pub use models::{SettlementOutcome, SettlementStage};
pub use service::{SettlementMode, SettlementOrchestrator};
pub use session::CheckoutSession;
pub use store::{CheckoutStore, MemoryCheckoutStore, PgCheckoutStore};
