//! UpdateCodeHandler - admin edits to promo codes.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, PromoCodeId};
use crate::domain::promo::{PromoCode, PromoCodePatch, PromoCodeType};
use crate::ports::{AgencyStore, PromoCodeStore};

/// Command to partially update a promo code.
#[derive(Debug, Clone)]
pub struct UpdateCodeCommand {
    pub id: PromoCodeId,
    pub patch: PromoCodePatch,
}

/// Handler for updating promo codes.
///
/// Keeps the owning agency's cached referral-code fields in step with the
/// edit: an agency-typed result syncs them, and retyping a code away from
/// agency clears them on the previous owner.
pub struct UpdateCodeHandler {
    codes: Arc<dyn PromoCodeStore>,
    agencies: Arc<dyn AgencyStore>,
}

impl UpdateCodeHandler {
    pub fn new(codes: Arc<dyn PromoCodeStore>, agencies: Arc<dyn AgencyStore>) -> Self {
        Self { codes, agencies }
    }

    /// Returns `None` when the code id does not exist (not-found sentinel,
    /// distinct from infrastructure failure).
    pub async fn handle(
        &self,
        command: UpdateCodeCommand,
    ) -> Result<Option<PromoCode>, DomainError> {
        let before = self.codes.find_by_id(&command.id).await?;

        let Some(updated) = self.codes.update(&command.id, command.patch).await? else {
            return Ok(None);
        };

        if updated.is_agency_code() {
            if let Some(agency_id) = updated.agency_id {
                self.agencies
                    .set_referral_code(&agency_id, Some((updated.id, updated.code.clone())))
                    .await?;
            }
        }

        // Retyped away from agency: the previous owner must not keep a stale
        // referral-code cache.
        if let Some(before) = before {
            if before.code_type == PromoCodeType::Agency && !updated.is_agency_code() {
                if let Some(agency_id) = before.agency_id {
                    self.agencies.set_referral_code(&agency_id, None).await?;
                }
            }
        }

        tracing::debug!(code = %updated.code, "promo code updated");
        Ok(Some(updated))
    }
}
