//! In-memory agency store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::agency::{Agency, AgencyPatch, CommissionCredit};
use crate::domain::foundation::{AgencyId, DomainError, PromoCodeId, Timestamp};
use crate::domain::promo::CodeKey;
use crate::ports::AgencyStore;

/// In-memory implementation of [`AgencyStore`].
///
/// Commission credits mutate the aggregates under the write lock, which is
/// the in-memory equivalent of a store-native atomic increment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgencyStore {
    agencies: Arc<RwLock<Vec<Agency>>>,
}

impl InMemoryAgencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgencyStore for InMemoryAgencyStore {
    async fn find_by_id(&self, id: &AgencyId) -> Result<Option<Agency>, DomainError> {
        let agencies = self.agencies.read().await;
        Ok(agencies.iter().find(|a| &a.id == id).cloned())
    }

    async fn insert(&self, agency: Agency) -> Result<Agency, DomainError> {
        let mut agencies = self.agencies.write().await;
        agencies.push(agency.clone());
        Ok(agency)
    }

    async fn update(
        &self,
        id: &AgencyId,
        patch: AgencyPatch,
    ) -> Result<Option<Agency>, DomainError> {
        let mut agencies = self.agencies.write().await;
        match agencies.iter_mut().find(|a| &a.id == id) {
            Some(agency) => {
                patch.apply_to(agency, Timestamp::now());
                Ok(Some(agency.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_referral_code(
        &self,
        id: &AgencyId,
        code: Option<(PromoCodeId, CodeKey)>,
    ) -> Result<Option<Agency>, DomainError> {
        let mut agencies = self.agencies.write().await;
        match agencies.iter_mut().find(|a| &a.id == id) {
            Some(agency) => {
                match code {
                    Some((code_id, key)) => {
                        agency.promo_code_id = Some(code_id);
                        agency.promo_code = Some(key);
                    }
                    None => {
                        agency.promo_code_id = None;
                        agency.promo_code = None;
                    }
                }
                agency.updated_at = Timestamp::now();
                Ok(Some(agency.clone()))
            }
            None => Ok(None),
        }
    }

    async fn credit_commission(
        &self,
        id: &AgencyId,
        credit: CommissionCredit,
    ) -> Result<Option<Agency>, DomainError> {
        let mut agencies = self.agencies.write().await;
        match agencies.iter_mut().find(|a| &a.id == id) {
            Some(agency) => {
                agency.total_referrals += credit.referrals;
                agency.total_earnings = agency.total_earnings + credit.amount;
                agency.pending_payout = agency.pending_payout + credit.amount;
                agency.updated_at = Timestamp::now();
                Ok(Some(agency.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Agency>, DomainError> {
        let agencies = self.agencies.read().await;
        Ok(agencies.iter().rev().cloned().collect())
    }
}
