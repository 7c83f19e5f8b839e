//! DeleteCodeHandler - admin deletion of promo codes.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, PromoCodeId};
use crate::ports::PromoCodeStore;

/// Command to delete a promo code.
#[derive(Debug, Clone)]
pub struct DeleteCodeCommand {
    pub id: PromoCodeId,
}

/// Handler for deleting promo codes.
///
/// Deletion does not touch the usage ledger: reports and agency dashboards
/// must tolerate usage records whose code no longer exists.
pub struct DeleteCodeHandler {
    codes: Arc<dyn PromoCodeStore>,
}

impl DeleteCodeHandler {
    pub fn new(codes: Arc<dyn PromoCodeStore>) -> Self {
        Self { codes }
    }

    /// Returns whether the code existed.
    pub async fn handle(&self, command: DeleteCodeCommand) -> Result<bool, DomainError> {
        let deleted = self.codes.delete(&command.id).await?;
        if deleted {
            tracing::debug!(id = %command.id, "promo code deleted");
        }
        Ok(deleted)
    }
}
