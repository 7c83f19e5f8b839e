//! In-memory adapters.
//!
//! Lock-protected implementations of the persistence ports, used by the
//! handler test suites and for local development without a database.

mod agency_store;
mod promo_code_store;
mod usage_ledger;

pub use agency_store::InMemoryAgencyStore;
pub use promo_code_store::InMemoryPromoCodeStore;
pub use usage_ledger::InMemoryUsageLedger;
