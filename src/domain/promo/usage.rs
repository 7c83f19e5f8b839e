//! Usage ledger records.
//!
//! One immutable record per successful application. The ledger is the source
//! of truth for usage counts; the cached `usage_count` on the code is a
//! projection recomputed from it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AgencyId, Money, NumberId, PromoCodeId, Timestamp, UsageRecordId, UserId,
};

/// Immutable record of one promo code redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCodeUsage {
    pub id: UsageRecordId,
    pub promo_code_id: PromoCodeId,
    pub user_id: UserId,
    /// The purchased resource.
    pub number_id: NumberId,
    pub discount_amount: Money,
    pub original_price: Money,
    pub final_price: Money,
    /// Zero unless the code was an agency referral code.
    pub commission_amount: Money,
    /// Denormalized from the code at application time; the code is the
    /// durable reference, and the record must survive code deletion.
    pub agency_id: Option<AgencyId>,
    pub used_at: Timestamp,
}

/// Write model for a ledger insert; the ledger assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsage {
    pub promo_code_id: PromoCodeId,
    pub user_id: UserId,
    pub number_id: NumberId,
    pub discount_amount: Money,
    pub original_price: Money,
    pub final_price: Money,
    pub commission_amount: Money,
    pub agency_id: Option<AgencyId>,
}

impl NewUsage {
    /// Materializes the record with a fresh id and the given instant.
    pub fn into_usage(self, used_at: Timestamp) -> PromoCodeUsage {
        PromoCodeUsage {
            id: UsageRecordId::new(),
            promo_code_id: self.promo_code_id,
            user_id: self.user_id,
            number_id: self.number_id,
            discount_amount: self.discount_amount,
            original_price: self.original_price,
            final_price: self.final_price,
            commission_amount: self.commission_amount,
            agency_id: self.agency_id,
            used_at,
        }
    }
}
