//! Agency persistence port.

use async_trait::async_trait;

use crate::domain::agency::{Agency, AgencyPatch, CommissionCredit};
use crate::domain::foundation::{AgencyId, DomainError, PromoCodeId};
use crate::domain::promo::CodeKey;

/// Port for persisting agencies and their referral aggregates.
#[async_trait]
pub trait AgencyStore: Send + Sync {
    /// Finds an agency by id.
    async fn find_by_id(&self, id: &AgencyId) -> Result<Option<Agency>, DomainError>;

    /// Inserts a new agency.
    async fn insert(&self, agency: Agency) -> Result<Agency, DomainError>;

    /// Applies a partial update, returning the updated agency or `None` if
    /// the id does not exist.
    async fn update(
        &self,
        id: &AgencyId,
        patch: AgencyPatch,
    ) -> Result<Option<Agency>, DomainError>;

    /// Sets or clears the cached referral-code link.
    ///
    /// `Some` syncs the cache after creating or retyping a code to agency;
    /// `None` clears it when the code is retyped away from agency.
    async fn set_referral_code(
        &self,
        id: &AgencyId,
        code: Option<(PromoCodeId, CodeKey)>,
    ) -> Result<Option<Agency>, DomainError>;

    /// Atomically increments the referral aggregates.
    ///
    /// Implementations must use a store-native increment (not a read-modify-
    /// write), so concurrent applications of the same code cannot lose
    /// updates.
    async fn credit_commission(
        &self,
        id: &AgencyId,
        credit: CommissionCredit,
    ) -> Result<Option<Agency>, DomainError>;

    /// Lists all agencies, newest first.
    async fn list(&self) -> Result<Vec<Agency>, DomainError>;
}
