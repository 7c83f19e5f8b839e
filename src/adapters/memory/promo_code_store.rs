//! In-memory promo code store.
//!
//! Backs the handler test suites and local development. Not durable.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PromoCodeId, Timestamp};
use crate::domain::promo::{CodeKey, PromoCode, PromoCodePatch};
use crate::ports::PromoCodeStore;

/// In-memory implementation of [`PromoCodeStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromoCodeStore {
    codes: Arc<RwLock<Vec<PromoCode>>>,
}

impl InMemoryPromoCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored codes (useful for tests).
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }
}

#[async_trait]
impl PromoCodeStore for InMemoryPromoCodeStore {
    async fn find_by_code(&self, code: &CodeKey) -> Result<Option<PromoCode>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes.iter().find(|c| &c.code == code).cloned())
    }

    async fn find_by_id(&self, id: &PromoCodeId) -> Result<Option<PromoCode>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes.iter().find(|c| &c.id == id).cloned())
    }

    async fn insert(&self, code: PromoCode) -> Result<PromoCode, DomainError> {
        let mut codes = self.codes.write().await;
        codes.push(code.clone());
        Ok(code)
    }

    async fn update(
        &self,
        id: &PromoCodeId,
        patch: PromoCodePatch,
    ) -> Result<Option<PromoCode>, DomainError> {
        let mut codes = self.codes.write().await;
        match codes.iter_mut().find(|c| &c.id == id) {
            Some(code) => {
                patch.apply_to(code, Timestamp::now());
                Ok(Some(code.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &PromoCodeId) -> Result<bool, DomainError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|c| &c.id != id);
        Ok(codes.len() < before)
    }

    async fn list(&self) -> Result<Vec<PromoCode>, DomainError> {
        let codes = self.codes.read().await;
        // Insertion order, reversed: newest first.
        Ok(codes.iter().rev().cloned().collect())
    }
}
