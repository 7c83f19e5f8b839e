//! Agency entity and write models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AgencyId, Money, PromoCodeId, Timestamp};
use crate::domain::promo::CodeKey;

/// Administrative status of an agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyStatus {
    Active,
    Inactive,
}

/// A partner agency earning commission on purchases made through its
/// referral promo code.
///
/// `total_referrals`, `total_earnings`, and `pending_payout` are cumulative
/// aggregates, mutated only through [`CommissionCredit`] increments (payout
/// resets happen outside this crate). Each agency owns exactly one referral
/// code, generated when the agency is created; the `promo_code` /
/// `promo_code_id` pair is a cached copy of that link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub email: String,
    /// Cached referral code string; cleared if the code is retyped away
    /// from agency.
    pub promo_code: Option<CodeKey>,
    pub promo_code_id: Option<PromoCodeId>,
    pub total_referrals: u64,
    pub total_earnings: Money,
    pub pending_payout: Money,
    /// Commission percentage of the original purchase price (0-100 scale).
    pub commission_rate: Decimal,
    pub status: AgencyStatus,
    pub bank_details: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields supplied by an admin when registering an agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgency {
    pub name: String,
    pub email: String,
    pub commission_rate: Decimal,
    pub bank_details: Option<String>,
}

impl NewAgency {
    /// Materializes the entity with zeroed aggregates and no referral code
    /// linked yet.
    pub fn into_agency(self, now: Timestamp) -> Agency {
        Agency {
            id: AgencyId::new(),
            name: self.name,
            email: self.email,
            promo_code: None,
            promo_code_id: None,
            total_referrals: 0,
            total_earnings: Money::ZERO,
            pending_payout: Money::ZERO,
            commission_rate: self.commission_rate,
            status: AgencyStatus::Active,
            bank_details: self.bank_details,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an agency; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgencyPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub status: Option<AgencyStatus>,
    pub bank_details: Option<String>,
}

impl AgencyPatch {
    /// Applies the patch to an entity, bumping `updated_at`.
    pub fn apply_to(self, agency: &mut Agency, now: Timestamp) {
        if let Some(name) = self.name {
            agency.name = name;
        }
        if let Some(email) = self.email {
            agency.email = email;
        }
        if let Some(rate) = self.commission_rate {
            agency.commission_rate = rate;
        }
        if let Some(status) = self.status {
            agency.status = status;
        }
        if let Some(bank_details) = self.bank_details {
            agency.bank_details = Some(bank_details);
        }
        agency.updated_at = now;
    }
}

/// Atomic increment applied to an agency's aggregates after a successful
/// referral-code application.
///
/// Stores apply this as a single store-native increment rather than a
/// read-modify-write, so concurrent applications of the same code cannot
/// lose updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionCredit {
    /// Referrals to add (one per application).
    pub referrals: u64,
    /// Commission added to both `total_earnings` and `pending_payout`.
    pub amount: Money,
}

impl CommissionCredit {
    /// Credit for a single referral with the given commission.
    pub fn referral(amount: Money) -> Self {
        Self {
            referrals: 1,
            amount,
        }
    }
}
