//! Foundation value objects shared across the domain.
//!
//! - `errors` - validation and domain error taxonomy
//! - `ids` - strongly-typed UUID identifiers
//! - `timestamp` - UTC instants with seconds-precision truncation
//! - `money` - 2-decimal-place monetary amounts

mod errors;
mod ids;
mod money;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AgencyId, NumberId, PromoCodeId, UsageRecordId, UserId};
pub use money::Money;
pub use timestamp::Timestamp;
