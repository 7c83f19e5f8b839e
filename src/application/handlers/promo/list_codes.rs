//! ListCodesHandler - admin listing with reconciled usage counts.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::promo::PromoCode;
use crate::ports::{PromoCodeStore, UsageLedger};

/// Handler for listing promo codes.
///
/// This is a reconciling read: each returned code carries the usage count
/// recomputed from the ledger, so any staleness left behind by an
/// interrupted apply is invisible to admins.
pub struct ListCodesHandler {
    codes: Arc<dyn PromoCodeStore>,
    ledger: Arc<dyn UsageLedger>,
}

impl ListCodesHandler {
    pub fn new(codes: Arc<dyn PromoCodeStore>, ledger: Arc<dyn UsageLedger>) -> Self {
        Self { codes, ledger }
    }

    pub async fn handle(&self) -> Result<Vec<PromoCode>, DomainError> {
        let mut codes = self.codes.list().await?;
        for code in &mut codes {
            code.usage_count = self.ledger.count_for_code(&code.id).await?;
        }
        Ok(codes)
    }
}
