//! Usage ledger port.

use async_trait::async_trait;

use crate::domain::foundation::{AgencyId, DomainError, PromoCodeId, UserId};
use crate::domain::promo::{NewUsage, PromoCodeUsage};

/// Port for the append-only redemption ledger.
///
/// Records are immutable once inserted. Counts read from here are the source
/// of truth; the cached `usage_count` on a promo code is a projection.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Appends one redemption record, assigning its id and timestamp.
    async fn insert(&self, usage: NewUsage) -> Result<PromoCodeUsage, DomainError>;

    /// Counts records referencing a code.
    async fn count_for_code(&self, code_id: &PromoCodeId) -> Result<u32, DomainError>;

    /// Counts records referencing a code for one user.
    async fn count_for_code_and_user(
        &self,
        code_id: &PromoCodeId,
        user_id: &UserId,
    ) -> Result<u32, DomainError>;

    /// Lists records for a code, newest first.
    async fn list_for_code(
        &self,
        code_id: &PromoCodeId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError>;

    /// Lists records credited to an agency, newest first.
    ///
    /// Queries by the denormalized agency id, so history survives deletion
    /// of the referral code itself.
    async fn list_for_agency(
        &self,
        agency_id: &AgencyId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError>;
}
