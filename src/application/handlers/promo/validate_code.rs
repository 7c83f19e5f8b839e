//! ValidateCodeHandler - read-only promo code validation.
//!
//! Runs the eligibility rules in a fixed order and short-circuits on the
//! first failure, so every rejection carries exactly one stable message.
//! No side effects; safe to call repeatedly.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Money, Timestamp, UserId};
use crate::domain::promo::{CodeKey, PromoCodeStatus, RejectionReason, Validation};
use crate::ports::{PromoCodeStore, UsageLedger};

/// Query to validate a promo code against a purchase.
#[derive(Debug, Clone)]
pub struct ValidateCodeQuery {
    /// Raw code as entered; matched case-insensitively.
    pub code: String,
    /// Purchase price before discount.
    pub price: Money,
    /// Needed to enforce per-user limits. When absent the per-user check is
    /// skipped; callers that care about enforcement must supply it.
    pub user_id: Option<UserId>,
}

/// Handler for promo code validation.
pub struct ValidateCodeHandler {
    codes: Arc<dyn PromoCodeStore>,
    ledger: Arc<dyn UsageLedger>,
}

impl ValidateCodeHandler {
    pub fn new(codes: Arc<dyn PromoCodeStore>, ledger: Arc<dyn UsageLedger>) -> Self {
        Self { codes, ledger }
    }

    /// Validates the code, returning either the resolved code with its
    /// computed discount or the first failing rule.
    ///
    /// Rule order: lookup, status, validity window, global usage limit
    /// (read live from the ledger, not the cached field), per-user limit,
    /// minimum purchase.
    pub async fn handle(&self, query: ValidateCodeQuery) -> Result<Validation, DomainError> {
        // An unparseable (empty) code can never match a stored one.
        let key = match CodeKey::try_new(&query.code) {
            Ok(key) => key,
            Err(_) => return Ok(Validation::invalid(RejectionReason::NotFound)),
        };

        let Some(mut promo_code) = self.codes.find_by_code(&key).await? else {
            return Ok(Validation::invalid(RejectionReason::NotFound));
        };

        if promo_code.status != PromoCodeStatus::Active {
            return Ok(Validation::invalid(RejectionReason::NotActive));
        }

        if !promo_code.is_within_window(Timestamp::now()) {
            return Ok(Validation::invalid(RejectionReason::OutsideValidityWindow));
        }

        if let Some(limit) = promo_code.usage_limit.filter(|l| *l > 0) {
            let count = self.ledger.count_for_code(&promo_code.id).await?;
            promo_code.usage_count = count;
            if count >= limit {
                return Ok(Validation::invalid(RejectionReason::UsageLimitReached));
            }
        }

        if let (Some(limit), Some(user_id)) = (
            promo_code.usage_limit_per_user.filter(|l| *l > 0),
            query.user_id.as_ref(),
        ) {
            let user_count = self
                .ledger
                .count_for_code_and_user(&promo_code.id, user_id)
                .await?;
            if user_count >= limit {
                return Ok(Validation::invalid(RejectionReason::PerUserLimitReached));
            }
        }

        if let Some(minimum) = promo_code.min_purchase {
            if query.price < minimum {
                return Ok(Validation::invalid(RejectionReason::BelowMinimumPurchase {
                    minimum,
                }));
            }
        }

        let discount_amount = promo_code.discount.discount_for(query.price);
        let final_price = query.price - discount_amount;

        tracing::debug!(code = %promo_code.code, %discount_amount, "promo code validated");

        Ok(Validation::Valid {
            promo_code,
            discount_amount,
            final_price,
        })
    }
}
