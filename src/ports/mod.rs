//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PromoCodeStore` - promo code persistence
//! - `UsageLedger` - append-only redemption ledger
//! - `AgencyStore` - agency persistence and referral aggregates

mod agency_store;
mod promo_code_store;
mod usage_ledger;

pub use agency_store::AgencyStore;
pub use promo_code_store::PromoCodeStore;
pub use usage_ledger::UsageLedger;
