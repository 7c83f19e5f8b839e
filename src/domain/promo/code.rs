//! Promo code entity and its write models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AgencyId, Money, PromoCodeId, Timestamp};

use super::{CodeKey, DiscountPolicy};

/// Whether a code is a general user code or a partner agency referral code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoCodeType {
    User,
    Agency,
}

/// Administrative status of a promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoCodeStatus {
    Active,
    Inactive,
    Expired,
}

/// A promotional code entitling a discount on a purchase.
///
/// `usage_count` is a cached projection of the usage ledger. It is recomputed
/// from the ledger after every successful application rather than incremented,
/// so a retried application cannot make it drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: PromoCodeId,
    pub code: CodeKey,
    pub code_type: PromoCodeType,
    pub discount: DiscountPolicy,
    /// Purchase floor; below it the code does not qualify.
    pub min_purchase: Option<Money>,
    /// Global redemption cap across all users.
    pub usage_limit: Option<u32>,
    /// Redemption cap per user.
    pub usage_limit_per_user: Option<u32>,
    /// Cached ledger count, see type-level docs.
    pub usage_count: u32,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub status: PromoCodeStatus,
    /// Owning agency, required semantically for agency codes.
    pub agency_id: Option<AgencyId>,
    pub agency_name: Option<String>,
    /// Commission percentage of the original purchase price (0-100 scale).
    pub commission_rate: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromoCode {
    /// Checks whether `now` falls inside the inclusive validity window.
    ///
    /// All three instants are truncated to UTC second precision first, so a
    /// stored bound that carried sub-second precision or came in through a
    /// non-UTC offset cannot flip the comparison near a boundary.
    pub fn is_within_window(&self, now: Timestamp) -> bool {
        let now = now.truncated_to_seconds();
        let from = self.valid_from.truncated_to_seconds();
        let until = self.valid_until.truncated_to_seconds();
        now >= from && now <= until
    }

    /// Returns true for agency referral codes.
    pub fn is_agency_code(&self) -> bool {
        self.code_type == PromoCodeType::Agency
    }
}

/// Fields supplied by an admin when creating a promo code.
///
/// The engine fills in the id, `usage_count` (zero), status (active unless
/// given), and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPromoCode {
    pub code: CodeKey,
    pub code_type: PromoCodeType,
    pub discount: DiscountPolicy,
    pub min_purchase: Option<Money>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub status: Option<PromoCodeStatus>,
    pub agency_id: Option<AgencyId>,
    pub agency_name: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub description: Option<String>,
}

impl NewPromoCode {
    /// Materializes the entity with a fresh id and timestamps.
    pub fn into_promo_code(self, now: Timestamp) -> PromoCode {
        PromoCode {
            id: PromoCodeId::new(),
            code: self.code,
            code_type: self.code_type,
            discount: self.discount,
            min_purchase: self.min_purchase,
            usage_limit: self.usage_limit,
            usage_limit_per_user: self.usage_limit_per_user,
            usage_count: 0,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            status: self.status.unwrap_or(PromoCodeStatus::Active),
            agency_id: self.agency_id,
            agency_name: self.agency_name,
            commission_rate: self.commission_rate,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a promo code; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodePatch {
    pub code: Option<CodeKey>,
    pub code_type: Option<PromoCodeType>,
    pub discount: Option<DiscountPolicy>,
    pub min_purchase: Option<Money>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub usage_count: Option<u32>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub status: Option<PromoCodeStatus>,
    pub agency_id: Option<AgencyId>,
    pub agency_name: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub description: Option<String>,
}

impl PromoCodePatch {
    /// Patch that only reconciles the cached usage count.
    pub fn usage_count(count: u32) -> Self {
        Self {
            usage_count: Some(count),
            ..Self::default()
        }
    }

    /// Applies the patch to an entity, bumping `updated_at`.
    pub fn apply_to(self, code: &mut PromoCode, now: Timestamp) {
        if let Some(key) = self.code {
            code.code = key;
        }
        if let Some(code_type) = self.code_type {
            code.code_type = code_type;
        }
        if let Some(discount) = self.discount {
            code.discount = discount;
        }
        if let Some(min_purchase) = self.min_purchase {
            code.min_purchase = Some(min_purchase);
        }
        if let Some(limit) = self.usage_limit {
            code.usage_limit = Some(limit);
        }
        if let Some(limit) = self.usage_limit_per_user {
            code.usage_limit_per_user = Some(limit);
        }
        if let Some(count) = self.usage_count {
            code.usage_count = count;
        }
        if let Some(from) = self.valid_from {
            code.valid_from = from;
        }
        if let Some(until) = self.valid_until {
            code.valid_until = until;
        }
        if let Some(status) = self.status {
            code.status = status;
        }
        if let Some(agency_id) = self.agency_id {
            code.agency_id = Some(agency_id);
        }
        if let Some(agency_name) = self.agency_name {
            code.agency_name = Some(agency_name);
        }
        if let Some(rate) = self.commission_rate {
            code.commission_rate = Some(rate);
        }
        if let Some(description) = self.description {
            code.description = Some(description);
        }
        code.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_code() -> PromoCode {
        NewPromoCode {
            code: CodeKey::try_new("SAVE20").unwrap(),
            code_type: PromoCodeType::User,
            discount: DiscountPolicy::percentage(dec!(20)),
            min_purchase: None,
            usage_limit: None,
            usage_limit_per_user: None,
            valid_from: Timestamp::now().minus_days(1),
            valid_until: Timestamp::now().add_days(1),
            status: None,
            agency_id: None,
            agency_name: None,
            commission_rate: None,
            description: None,
        }
        .into_promo_code(Timestamp::now())
    }

    #[test]
    fn new_promo_code_defaults_to_active_with_zero_usage() {
        let code = sample_code();
        assert_eq!(code.status, PromoCodeStatus::Active);
        assert_eq!(code.usage_count, 0);
        assert!(!code.is_agency_code());
    }

    #[test]
    fn window_is_inclusive_of_bounds() {
        let mut code = sample_code();
        let from = Timestamp::from_unix_secs(1_000_000);
        let until = Timestamp::from_unix_secs(2_000_000);
        code.valid_from = from;
        code.valid_until = until;

        assert!(code.is_within_window(from));
        assert!(code.is_within_window(until));
        assert!(code.is_within_window(Timestamp::from_unix_secs(1_500_000)));
    }

    #[test]
    fn window_rejects_outside_instants() {
        let mut code = sample_code();
        code.valid_from = Timestamp::from_unix_secs(1_000_000);
        code.valid_until = Timestamp::from_unix_secs(2_000_000);

        assert!(!code.is_within_window(Timestamp::from_unix_secs(999_999)));
        assert!(!code.is_within_window(Timestamp::from_unix_secs(2_000_001)));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut code = sample_code();
        let original_code_key = code.code.clone();

        PromoCodePatch {
            status: Some(PromoCodeStatus::Inactive),
            usage_limit: Some(5),
            ..PromoCodePatch::default()
        }
        .apply_to(&mut code, Timestamp::now());

        assert_eq!(code.status, PromoCodeStatus::Inactive);
        assert_eq!(code.usage_limit, Some(5));
        assert_eq!(code.code, original_code_key);
    }

    #[test]
    fn usage_count_patch_touches_only_the_counter() {
        let mut code = sample_code();
        PromoCodePatch::usage_count(7).apply_to(&mut code, Timestamp::now());
        assert_eq!(code.usage_count, 7);
        assert_eq!(code.status, PromoCodeStatus::Active);
    }

    #[test]
    fn patch_bumps_updated_at() {
        let mut code = sample_code();
        let later = code.updated_at.add_days(1);
        PromoCodePatch::default().apply_to(&mut code, later);
        assert_eq!(code.updated_at, later);
    }
}
