//! UpdateAgencyHandler - admin edits to agencies.

use std::sync::Arc;

use crate::domain::agency::{Agency, AgencyPatch};
use crate::domain::foundation::{AgencyId, DomainError};
use crate::ports::AgencyStore;

/// Command to partially update an agency.
#[derive(Debug, Clone)]
pub struct UpdateAgencyCommand {
    pub id: AgencyId,
    pub patch: AgencyPatch,
}

/// Handler for updating agencies.
///
/// Referral aggregates and the cached code link are not editable through
/// this path; they move only via commission credits and code lifecycle
/// changes.
pub struct UpdateAgencyHandler {
    agencies: Arc<dyn AgencyStore>,
}

impl UpdateAgencyHandler {
    pub fn new(agencies: Arc<dyn AgencyStore>) -> Self {
        Self { agencies }
    }

    /// Returns `None` when the agency id does not exist.
    pub async fn handle(
        &self,
        command: UpdateAgencyCommand,
    ) -> Result<Option<Agency>, DomainError> {
        let updated = self.agencies.update(&command.id, command.patch).await?;
        if let Some(agency) = &updated {
            tracing::debug!(agency = %agency.id, "agency updated");
        }
        Ok(updated)
    }
}
