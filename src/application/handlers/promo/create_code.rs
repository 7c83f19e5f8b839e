//! CreateCodeHandler - admin creation of promo codes.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::promo::{NewPromoCode, PromoCode};
use crate::ports::{AgencyStore, PromoCodeStore};

/// Command to create a promo code.
#[derive(Debug, Clone)]
pub struct CreateCodeCommand {
    pub new_code: NewPromoCode,
}

/// Handler for creating promo codes.
///
/// New codes start active with a zero usage count. When an agency-typed code
/// names its owning agency, the agency's cached referral-code fields are
/// synced to the new code.
pub struct CreateCodeHandler {
    codes: Arc<dyn PromoCodeStore>,
    agencies: Arc<dyn AgencyStore>,
}

impl CreateCodeHandler {
    pub fn new(codes: Arc<dyn PromoCodeStore>, agencies: Arc<dyn AgencyStore>) -> Self {
        Self { codes, agencies }
    }

    pub async fn handle(&self, command: CreateCodeCommand) -> Result<PromoCode, DomainError> {
        let promo_code = command.new_code.into_promo_code(Timestamp::now());
        let promo_code = self.codes.insert(promo_code).await?;

        if promo_code.is_agency_code() {
            if let Some(agency_id) = promo_code.agency_id {
                self.agencies
                    .set_referral_code(
                        &agency_id,
                        Some((promo_code.id, promo_code.code.clone())),
                    )
                    .await?;
            }
        }

        tracing::debug!(code = %promo_code.code, "promo code created");
        Ok(promo_code)
    }
}
