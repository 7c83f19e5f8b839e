//! GetAgencyDashboardHandler - agency overview with redemption history.

use std::sync::Arc;

use crate::domain::agency::Agency;
use crate::domain::foundation::{AgencyId, DomainError};
use crate::domain::promo::PromoCodeUsage;
use crate::ports::{AgencyStore, UsageLedger};

/// Query for an agency's dashboard.
#[derive(Debug, Clone)]
pub struct GetAgencyDashboardQuery {
    pub agency_id: AgencyId,
}

/// An agency together with the redemptions credited to it.
#[derive(Debug, Clone)]
pub struct AgencyDashboard {
    pub agency: Agency,
    /// Newest first. Looked up by the denormalized agency id on the usage
    /// records, so history survives deletion of the referral code.
    pub usages: Vec<PromoCodeUsage>,
}

/// Handler for the agency dashboard read.
pub struct GetAgencyDashboardHandler {
    agencies: Arc<dyn AgencyStore>,
    ledger: Arc<dyn UsageLedger>,
}

impl GetAgencyDashboardHandler {
    pub fn new(agencies: Arc<dyn AgencyStore>, ledger: Arc<dyn UsageLedger>) -> Self {
        Self { agencies, ledger }
    }

    /// Returns `None` when the agency id does not exist.
    pub async fn handle(
        &self,
        query: GetAgencyDashboardQuery,
    ) -> Result<Option<AgencyDashboard>, DomainError> {
        let Some(agency) = self.agencies.find_by_id(&query.agency_id).await? else {
            return Ok(None);
        };

        let usages = self.ledger.list_for_agency(&query.agency_id).await?;
        Ok(Some(AgencyDashboard { agency, usages }))
    }
}
