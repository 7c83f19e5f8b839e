//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - Lock-protected in-memory stores for tests and development
//! - `postgres` - PostgreSQL-backed persistence

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAgencyStore, InMemoryPromoCodeStore, InMemoryUsageLedger};
pub use postgres::{PostgresAgencyStore, PostgresPromoCodeStore, PostgresUsageLedger};
