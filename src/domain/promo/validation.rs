//! Validation and application result types.
//!
//! Business-rule rejections are expected outcomes, carried as values so
//! callers can present the message verbatim. Only infrastructure faults
//! travel as `DomainError`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

use super::{PromoCode, PromoCodeUsage};

/// Why a promo code was rejected for a purchase.
///
/// Each variant maps to one stable, user-facing message; callers rely on the
/// wording staying put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RejectionReason {
    /// No code with this key exists.
    NotFound,

    /// The code exists but its status is not active.
    NotActive,

    /// The current instant is outside the inclusive validity window.
    OutsideValidityWindow,

    /// The global usage limit is exhausted.
    UsageLimitReached,

    /// This user has exhausted their personal limit.
    PerUserLimitReached,

    /// The purchase is below the code's minimum.
    BelowMinimumPurchase {
        /// The required minimum purchase amount.
        minimum: Money,
    },
}

impl RejectionReason {
    /// Stable user-facing message for this rejection.
    pub fn user_message(&self) -> String {
        match self {
            RejectionReason::NotFound => "Promo code not found".to_string(),
            RejectionReason::NotActive => "Promo code is not active".to_string(),
            RejectionReason::OutsideValidityWindow => {
                "Promo code has expired or is not yet valid".to_string()
            }
            RejectionReason::UsageLimitReached => {
                "Promo code has reached its usage limit".to_string()
            }
            RejectionReason::PerUserLimitReached => {
                "Promo code has reached its per user usage limit".to_string()
            }
            RejectionReason::BelowMinimumPurchase { minimum } => {
                format!("Minimum purchase of ${} required", minimum)
            }
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Result of validating a promo code against a purchase.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Code is usable for this purchase.
    Valid {
        promo_code: PromoCode,
        discount_amount: Money,
        final_price: Money,
    },
    /// Code was rejected.
    Invalid { reason: RejectionReason },
}

impl Validation {
    /// Creates an invalid result.
    pub fn invalid(reason: RejectionReason) -> Self {
        Validation::Invalid { reason }
    }

    /// Returns true if the code validated.
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    /// Converts to a Result, with rejection becoming the error.
    pub fn into_result(self) -> Result<(PromoCode, Money, Money), RejectionReason> {
        match self {
            Validation::Valid {
                promo_code,
                discount_amount,
                final_price,
            } => Ok((promo_code, discount_amount, final_price)),
            Validation::Invalid { reason } => Err(reason),
        }
    }
}

/// Result of applying a promo code to a purchase.
#[derive(Debug, Clone, PartialEq)]
pub enum Application {
    /// Code was applied; side effects were recorded.
    Applied {
        promo_code: PromoCode,
        discount_amount: Money,
        final_price: Money,
        /// Zero unless the code belongs to an agency with a commission rate.
        commission_amount: Money,
        /// The immutable ledger record written for this redemption.
        usage: PromoCodeUsage,
    },
    /// Validation rejected the code; nothing was written.
    Rejected { reason: RejectionReason },
}

impl Application {
    /// Returns true if the code was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Application::Applied { .. })
    }

    /// Returns the rejection reason, if any.
    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            Application::Rejected { reason } => Some(reason),
            Application::Applied { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ════════════════════════════════════════════════════════════════════════════
    // Rejection Messages
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn not_found_message_is_stable() {
        assert_eq!(RejectionReason::NotFound.user_message(), "Promo code not found");
    }

    #[test]
    fn not_active_message_is_stable() {
        assert_eq!(
            RejectionReason::NotActive.user_message(),
            "Promo code is not active"
        );
    }

    #[test]
    fn window_message_is_stable() {
        assert_eq!(
            RejectionReason::OutsideValidityWindow.user_message(),
            "Promo code has expired or is not yet valid"
        );
    }

    #[test]
    fn usage_limit_message_is_stable() {
        assert_eq!(
            RejectionReason::UsageLimitReached.user_message(),
            "Promo code has reached its usage limit"
        );
    }

    #[test]
    fn per_user_limit_message_is_stable() {
        assert_eq!(
            RejectionReason::PerUserLimitReached.user_message(),
            "Promo code has reached its per user usage limit"
        );
    }

    #[test]
    fn minimum_purchase_message_includes_amount() {
        let reason = RejectionReason::BelowMinimumPurchase {
            minimum: crate::domain::foundation::Money::new(dec!(50)),
        };
        assert_eq!(reason.user_message(), "Minimum purchase of $50 required");
    }

    #[test]
    fn minimum_purchase_message_is_stable_across_decimal_scales() {
        // NUMERIC(12,2) columns come back at scale 2; the message must not
        // change between a freshly built minimum and one read from storage.
        let seeded = RejectionReason::BelowMinimumPurchase {
            minimum: Money::new(dec!(50)),
        };
        let stored = RejectionReason::BelowMinimumPurchase {
            minimum: Money::new(dec!(50.00)),
        };
        assert_eq!(seeded.user_message(), "Minimum purchase of $50 required");
        assert_eq!(stored.user_message(), seeded.user_message());
    }

    #[test]
    fn display_matches_user_message() {
        let reason = RejectionReason::NotFound;
        assert_eq!(format!("{}", reason), reason.user_message());
    }

    #[test]
    fn rejection_serializes_with_type_tag() {
        let json = serde_json::to_string(&RejectionReason::UsageLimitReached).unwrap();
        assert!(json.contains("\"type\":\"usage_limit_reached\""));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Result Shapes
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn invalid_validation_is_not_valid() {
        let validation = Validation::invalid(RejectionReason::NotFound);
        assert!(!validation.is_valid());
        assert_eq!(
            validation.into_result().unwrap_err(),
            RejectionReason::NotFound
        );
    }

    #[test]
    fn rejected_application_exposes_reason() {
        let application = Application::Rejected {
            reason: RejectionReason::NotActive,
        };
        assert!(!application.is_applied());
        assert_eq!(application.rejection(), Some(&RejectionReason::NotActive));
    }
}
