//! ApplyCodeHandler - promo code application with side effects.
//!
//! Validates first (propagating any rejection untouched), then records the
//! redemption: one ledger insert, a usage-count reconciliation on the code,
//! and an atomic commission credit for agency codes.
//!
//! The three writes are independent (no multi-document transaction). A
//! failure after the ledger insert leaves the cached count or the agency
//! aggregates stale until the next reconciling read; availability is favored
//! over strict atomicity here.

use std::sync::Arc;

use crate::domain::agency::CommissionCredit;
use crate::domain::foundation::{DomainError, Money, NumberId, UserId};
use crate::domain::promo::{Application, NewUsage, PromoCodePatch};
use crate::ports::{AgencyStore, PromoCodeStore, UsageLedger};

use super::{ValidateCodeHandler, ValidateCodeQuery};

/// Command to apply a promo code to a purchase.
#[derive(Debug, Clone)]
pub struct ApplyCodeCommand {
    pub code: String,
    pub price: Money,
    pub user_id: UserId,
    /// The purchased resource this redemption pays for.
    pub number_id: NumberId,
}

/// Handler for promo code application.
pub struct ApplyCodeHandler {
    codes: Arc<dyn PromoCodeStore>,
    ledger: Arc<dyn UsageLedger>,
    agencies: Arc<dyn AgencyStore>,
    validator: ValidateCodeHandler,
}

impl ApplyCodeHandler {
    pub fn new(
        codes: Arc<dyn PromoCodeStore>,
        ledger: Arc<dyn UsageLedger>,
        agencies: Arc<dyn AgencyStore>,
    ) -> Self {
        let validator = ValidateCodeHandler::new(codes.clone(), ledger.clone());
        Self {
            codes,
            ledger,
            agencies,
            validator,
        }
    }

    pub async fn handle(&self, command: ApplyCodeCommand) -> Result<Application, DomainError> {
        let validation = self
            .validator
            .handle(ValidateCodeQuery {
                code: command.code.clone(),
                price: command.price,
                user_id: Some(command.user_id),
            })
            .await?;

        let (mut promo_code, discount_amount, final_price) = match validation.into_result() {
            Ok(valid) => valid,
            Err(reason) => return Ok(Application::Rejected { reason }),
        };

        // Commission applies to the original price, not the discounted one.
        let commission_amount = match (promo_code.is_agency_code(), promo_code.commission_rate) {
            (true, Some(rate)) => command.price.percent(rate),
            _ => Money::ZERO,
        };

        let usage = self
            .ledger
            .insert(NewUsage {
                promo_code_id: promo_code.id,
                user_id: command.user_id,
                number_id: command.number_id,
                discount_amount,
                original_price: command.price,
                final_price,
                commission_amount,
                // Denormalized from the code: the code is the durable
                // reference and the record must outlive the Agency row.
                agency_id: promo_code.agency_id,
            })
            .await?;

        // Recompute the cached count from the ledger. Recomputation is
        // idempotent under retries where a blind +1 is not.
        let actual_count = self.ledger.count_for_code(&promo_code.id).await?;
        if let Some(updated) = self
            .codes
            .update(&promo_code.id, PromoCodePatch::usage_count(actual_count))
            .await?
        {
            promo_code = updated;
        }

        if promo_code.is_agency_code() {
            if let Some(agency_id) = promo_code.agency_id {
                let credited = self
                    .agencies
                    .credit_commission(&agency_id, CommissionCredit::referral(commission_amount))
                    .await?;
                if credited.is_none() {
                    tracing::warn!(
                        %agency_id,
                        code = %promo_code.code,
                        "agency missing while crediting commission; aggregates not updated"
                    );
                }
            }
        }

        tracing::debug!(
            code = %promo_code.code,
            %discount_amount,
            %commission_amount,
            "promo code applied"
        );

        Ok(Application::Applied {
            promo_code,
            discount_amount,
            final_price,
            commission_amount,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAgencyStore, InMemoryPromoCodeStore, InMemoryUsageLedger,
    };
    use crate::domain::agency::NewAgency;
    use crate::domain::foundation::Timestamp;
    use crate::domain::promo::{
        CodeKey, DiscountPolicy, NewPromoCode, PromoCodeType, RejectionReason,
    };
    use rust_decimal_macros::dec;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn money(d: rust_decimal::Decimal) -> Money {
        Money::new(d)
    }

    struct Fixture {
        codes: Arc<InMemoryPromoCodeStore>,
        ledger: Arc<InMemoryUsageLedger>,
        agencies: Arc<InMemoryAgencyStore>,
        handler: ApplyCodeHandler,
    }

    fn fixture() -> Fixture {
        let codes = Arc::new(InMemoryPromoCodeStore::new());
        let ledger = Arc::new(InMemoryUsageLedger::new());
        let agencies = Arc::new(InMemoryAgencyStore::new());
        let handler = ApplyCodeHandler::new(codes.clone(), ledger.clone(), agencies.clone());
        Fixture {
            codes,
            ledger,
            agencies,
            handler,
        }
    }

    fn user_code(code: &str, discount: DiscountPolicy) -> NewPromoCode {
        NewPromoCode {
            code: CodeKey::try_new(code).unwrap(),
            code_type: PromoCodeType::User,
            discount,
            min_purchase: None,
            usage_limit: None,
            usage_limit_per_user: None,
            valid_from: Timestamp::now().minus_days(1),
            valid_until: Timestamp::now().add_days(30),
            status: None,
            agency_id: None,
            agency_name: None,
            commission_rate: None,
            description: None,
        }
    }

    fn command(code: &str, price: rust_decimal::Decimal) -> ApplyCodeCommand {
        ApplyCodeCommand {
            code: code.to_string(),
            price: money(price),
            user_id: UserId::new(),
            number_id: NumberId::new(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejection_is_propagated_with_no_side_effects() {
        let fx = fixture();

        let result = fx.handler.handle(command("NOPE", dec!(100))).await.unwrap();
        assert_eq!(result.rejection(), Some(&RejectionReason::NotFound));

        let codes = fx.codes.list().await.unwrap();
        assert!(codes.is_empty());
    }

    #[tokio::test]
    async fn usage_limited_code_rejects_the_next_sequential_apply() {
        let fx = fixture();
        let mut new_code = user_code("TWICE", DiscountPolicy::percentage(dec!(10)));
        new_code.usage_limit = Some(2);
        let code = new_code.into_promo_code(Timestamp::now());
        let id = code.id;
        fx.codes.insert(code).await.unwrap();

        for _ in 0..2 {
            let applied = fx.handler.handle(command("TWICE", dec!(100))).await.unwrap();
            assert!(applied.is_applied());
        }

        let third = fx.handler.handle(command("TWICE", dec!(100))).await.unwrap();
        assert_eq!(third.rejection(), Some(&RejectionReason::UsageLimitReached));
        assert_eq!(fx.ledger.count_for_code(&id).await.unwrap(), 2);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Ledger and Cached Count
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn apply_appends_one_record_and_reconciles_the_cached_count() {
        let fx = fixture();
        let code = user_code("SAVE20", DiscountPolicy::percentage(dec!(20)))
            .into_promo_code(Timestamp::now());
        let id = code.id;
        fx.codes.insert(code).await.unwrap();

        let result = fx.handler.handle(command("SAVE20", dec!(100))).await.unwrap();

        let Application::Applied {
            promo_code, usage, ..
        } = result
        else {
            panic!("expected Applied");
        };

        assert_eq!(fx.ledger.count_for_code(&id).await.unwrap(), 1);
        assert_eq!(promo_code.usage_count, 1);
        assert_eq!(usage.original_price, money(dec!(100)));
        assert_eq!(usage.final_price, money(dec!(80)));

        let stored = fx.codes.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 1);
    }

    #[tokio::test]
    async fn user_code_accrues_no_commission() {
        let fx = fixture();
        let code = user_code("SAVE20", DiscountPolicy::percentage(dec!(20)))
            .into_promo_code(Timestamp::now());
        fx.codes.insert(code).await.unwrap();

        let result = fx.handler.handle(command("SAVE20", dec!(100))).await.unwrap();
        let Application::Applied {
            commission_amount, ..
        } = result
        else {
            panic!("expected Applied");
        };
        assert_eq!(commission_amount, Money::ZERO);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Agency Commission
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn agency_code_credits_commission_on_the_original_price() {
        let fx = fixture();
        let agency = NewAgency {
            name: "Acme".to_string(),
            email: "a@acme.example".to_string(),
            commission_rate: dec!(10),
            bank_details: None,
        }
        .into_agency(Timestamp::now());
        let agency_id = agency.id;
        fx.agencies.insert(agency).await.unwrap();

        let mut new_code = user_code("AGENCYREF1", DiscountPolicy::percentage(dec!(50)));
        new_code.code_type = PromoCodeType::Agency;
        new_code.agency_id = Some(agency_id);
        new_code.commission_rate = Some(dec!(10));
        fx.codes
            .insert(new_code.into_promo_code(Timestamp::now()))
            .await
            .unwrap();

        let result = fx
            .handler
            .handle(command("AGENCYREF1", dec!(100)))
            .await
            .unwrap();

        let Application::Applied {
            commission_amount,
            discount_amount,
            ..
        } = result
        else {
            panic!("expected Applied");
        };

        // 10% of the original 100, not of the discounted 50.
        assert_eq!(commission_amount, money(dec!(10)));
        assert_eq!(discount_amount, money(dec!(50)));

        let agency = fx.agencies.find_by_id(&agency_id).await.unwrap().unwrap();
        assert_eq!(agency.total_referrals, 1);
        assert_eq!(agency.total_earnings, money(dec!(10)));
        assert_eq!(agency.pending_payout, money(dec!(10)));
    }

    #[tokio::test]
    async fn missing_agency_does_not_fail_the_application() {
        let fx = fixture();
        let mut new_code = user_code("GHOSTAGENCY", DiscountPolicy::percentage(dec!(10)));
        new_code.code_type = PromoCodeType::Agency;
        new_code.agency_id = Some(crate::domain::foundation::AgencyId::new());
        new_code.commission_rate = Some(dec!(5));
        fx.codes
            .insert(new_code.into_promo_code(Timestamp::now()))
            .await
            .unwrap();

        let result = fx
            .handler
            .handle(command("GHOSTAGENCY", dec!(100)))
            .await
            .unwrap();
        assert!(result.is_applied());
    }

    #[tokio::test]
    async fn agency_code_without_rate_accrues_zero_commission() {
        let fx = fixture();
        let agency = NewAgency {
            name: "Acme".to_string(),
            email: "a@acme.example".to_string(),
            commission_rate: dec!(10),
            bank_details: None,
        }
        .into_agency(Timestamp::now());
        let agency_id = agency.id;
        fx.agencies.insert(agency).await.unwrap();

        let mut new_code = user_code("NORATE", DiscountPolicy::percentage(dec!(10)));
        new_code.code_type = PromoCodeType::Agency;
        new_code.agency_id = Some(agency_id);
        fx.codes
            .insert(new_code.into_promo_code(Timestamp::now()))
            .await
            .unwrap();

        let result = fx.handler.handle(command("NORATE", dec!(100))).await.unwrap();
        let Application::Applied {
            commission_amount, ..
        } = result
        else {
            panic!("expected Applied");
        };
        assert_eq!(commission_amount, Money::ZERO);

        // Referral still counts even with a zero commission.
        let agency = fx.agencies.find_by_id(&agency_id).await.unwrap().unwrap();
        assert_eq!(agency.total_referrals, 1);
        assert_eq!(agency.total_earnings, Money::ZERO);
    }
}
