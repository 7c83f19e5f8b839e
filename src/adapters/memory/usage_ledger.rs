//! In-memory usage ledger.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AgencyId, DomainError, PromoCodeId, Timestamp, UserId};
use crate::domain::promo::{NewUsage, PromoCodeUsage};
use crate::ports::UsageLedger;

/// In-memory implementation of [`UsageLedger`]. Append-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageLedger {
    records: Arc<RwLock<Vec<PromoCodeUsage>>>,
}

impl InMemoryUsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records (useful for tests).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl UsageLedger for InMemoryUsageLedger {
    async fn insert(&self, usage: NewUsage) -> Result<PromoCodeUsage, DomainError> {
        let record = usage.into_usage(Timestamp::now());
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn count_for_code(&self, code_id: &PromoCodeId) -> Result<u32, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| &r.promo_code_id == code_id).count() as u32)
    }

    async fn count_for_code_and_user(
        &self,
        code_id: &PromoCodeId,
        user_id: &UserId,
    ) -> Result<u32, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| &r.promo_code_id == code_id && &r.user_id == user_id)
            .count() as u32)
    }

    async fn list_for_code(
        &self,
        code_id: &PromoCodeId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| &r.promo_code_id == code_id)
            .cloned()
            .collect())
    }

    async fn list_for_agency(
        &self,
        agency_id: &AgencyId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.agency_id.as_ref() == Some(agency_id))
            .cloned()
            .collect())
    }
}
