//! Promo code persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PromoCodeId};
use crate::domain::promo::{CodeKey, PromoCode, PromoCodePatch};

/// Port for persisting promo codes.
///
/// Lookups by code use the normalized (uppercase) form, so matching is
/// case-insensitive from the caller's point of view. Update and delete use
/// not-found sentinels (`None` / `false`) rather than errors; `Err` is
/// reserved for infrastructure failures.
#[async_trait]
pub trait PromoCodeStore: Send + Sync {
    /// Finds a code by its normalized string.
    async fn find_by_code(&self, code: &CodeKey) -> Result<Option<PromoCode>, DomainError>;

    /// Finds a code by id.
    async fn find_by_id(&self, id: &PromoCodeId) -> Result<Option<PromoCode>, DomainError>;

    /// Inserts a new code.
    async fn insert(&self, code: PromoCode) -> Result<PromoCode, DomainError>;

    /// Applies a partial update, returning the updated code or `None` if the
    /// id does not exist.
    async fn update(
        &self,
        id: &PromoCodeId,
        patch: PromoCodePatch,
    ) -> Result<Option<PromoCode>, DomainError>;

    /// Deletes a code, returning whether it existed. Usage history is not
    /// touched.
    async fn delete(&self, id: &PromoCodeId) -> Result<bool, DomainError>;

    /// Lists all codes, newest first.
    async fn list(&self) -> Result<Vec<PromoCode>, DomainError>;
}
