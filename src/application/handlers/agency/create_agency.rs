//! CreateAgencyHandler - agency registration with referral-code generation.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::agency::{Agency, NewAgency};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::promo::{CodeKey, DiscountPolicy, NewPromoCode, PromoCodeType};
use crate::ports::{AgencyStore, PromoCodeStore};

/// Default discount granted by a freshly generated referral code.
const DEFAULT_REFERRAL_DISCOUNT_PERCENT: Decimal = Decimal::TEN;

/// Validity of a freshly generated referral code, in days.
const REFERRAL_CODE_VALIDITY_DAYS: i64 = 365;

/// Command to register an agency.
#[derive(Debug, Clone)]
pub struct CreateAgencyCommand {
    pub new_agency: NewAgency,
}

/// Handler for agency registration.
///
/// Every agency owns exactly one referral promo code, generated here
/// alongside the agency itself: a random `AGENCY`-prefixed code with the
/// default 10% discount, the agency's commission rate, and one year of
/// validity. The agency's cached code fields are linked before returning.
pub struct CreateAgencyHandler {
    agencies: Arc<dyn AgencyStore>,
    codes: Arc<dyn PromoCodeStore>,
}

impl CreateAgencyHandler {
    pub fn new(agencies: Arc<dyn AgencyStore>, codes: Arc<dyn PromoCodeStore>) -> Self {
        Self { agencies, codes }
    }

    pub async fn handle(&self, command: CreateAgencyCommand) -> Result<Agency, DomainError> {
        let now = Timestamp::now();
        let agency = command.new_agency.into_agency(now);
        let agency = self.agencies.insert(agency).await?;

        let referral_code = NewPromoCode {
            code: generate_referral_key(),
            code_type: PromoCodeType::Agency,
            discount: DiscountPolicy::percentage(DEFAULT_REFERRAL_DISCOUNT_PERCENT),
            min_purchase: None,
            usage_limit: None,
            usage_limit_per_user: None,
            valid_from: now,
            valid_until: now.add_days(REFERRAL_CODE_VALIDITY_DAYS),
            status: None,
            agency_id: Some(agency.id),
            agency_name: Some(agency.name.clone()),
            commission_rate: Some(agency.commission_rate),
            description: Some(format!("Agency referral code for {}", agency.name)),
        }
        .into_promo_code(now);

        let referral_code = self.codes.insert(referral_code).await?;

        let linked = self
            .agencies
            .set_referral_code(&agency.id, Some((referral_code.id, referral_code.code.clone())))
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::AgencyNotFound,
                    format!("Agency {} vanished while linking its referral code", agency.id),
                )
            })?;

        tracing::debug!(agency = %linked.id, code = %referral_code.code, "agency created");
        Ok(linked)
    }
}

/// Generates a unique referral code: `AGENCY` plus 8 random alphanumerics.
///
/// Randomness comes from a v4 UUID's hex form, which is ample for admin-side
/// code generation; the store's unique constraint on the code backstops the
/// (negligible) collision chance.
fn generate_referral_key() -> CodeKey {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    CodeKey::try_new(&format!("AGENCY{}", suffix)).expect("generated code is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAgencyStore, InMemoryPromoCodeStore};
    use crate::domain::promo::PromoCodeStatus;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn fixture() -> (
        Arc<InMemoryAgencyStore>,
        Arc<InMemoryPromoCodeStore>,
        CreateAgencyHandler,
    ) {
        let agencies = Arc::new(InMemoryAgencyStore::new());
        let codes = Arc::new(InMemoryPromoCodeStore::new());
        let handler = CreateAgencyHandler::new(agencies.clone(), codes.clone());
        (agencies, codes, handler)
    }

    fn command() -> CreateAgencyCommand {
        CreateAgencyCommand {
            new_agency: NewAgency {
                name: "Acme Marketing".to_string(),
                email: "partners@acme.example".to_string(),
                commission_rate: dec!(12),
                bank_details: None,
            },
        }
    }

    #[tokio::test]
    async fn creates_agency_with_linked_referral_code() {
        let (_, codes, handler) = fixture();

        let agency = handler.handle(command()).await.unwrap();

        let code_id = agency.promo_code_id.expect("referral code linked");
        let code = codes.find_by_id(&code_id).await.unwrap().unwrap();

        assert_eq!(code.code_type, PromoCodeType::Agency);
        assert_eq!(code.agency_id, Some(agency.id));
        assert_eq!(code.commission_rate, Some(dec!(12)));
        assert_eq!(code.status, PromoCodeStatus::Active);
        assert_eq!(agency.promo_code, Some(code.code.clone()));
    }

    #[tokio::test]
    async fn referral_code_has_default_discount_and_one_year_validity() {
        let (_, codes, handler) = fixture();

        let agency = handler.handle(command()).await.unwrap();
        let code = codes
            .find_by_id(&agency.promo_code_id.unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            code.discount,
            DiscountPolicy::percentage(dec!(10))
        );
        let window = *code.valid_until.as_datetime() - *code.valid_from.as_datetime();
        assert_eq!(window.num_days(), 365);
        assert_eq!(
            code.description.as_deref(),
            Some("Agency referral code for Acme Marketing")
        );
    }

    #[tokio::test]
    async fn generated_codes_have_the_agency_prefix_and_are_unique() {
        let (_, _, handler) = fixture();

        let mut seen = HashSet::new();
        for _ in 0..10 {
            let agency = handler.handle(command()).await.unwrap();
            let code = agency.promo_code.unwrap();
            assert!(code.as_str().starts_with("AGENCY"));
            assert_eq!(code.as_str().len(), "AGENCY".len() + 8);
            assert!(seen.insert(code));
        }
    }

    #[tokio::test]
    async fn new_agency_aggregates_start_at_zero() {
        let (agencies, _, handler) = fixture();

        let agency = handler.handle(command()).await.unwrap();
        let stored = agencies.find_by_id(&agency.id).await.unwrap().unwrap();

        assert_eq!(stored.total_referrals, 0);
        assert!(stored.total_earnings.is_zero());
        assert!(stored.pending_payout.is_zero());
    }
}
