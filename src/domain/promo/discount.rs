//! Discount calculation policy.
//!
//! A promo code carries one of two discount shapes:
//!
//! - **Percentage**: `price * rate / 100`, optionally capped by `max_discount`.
//! - **Fixed**: a flat amount, optionally capped by `max_discount`, and always
//!   capped by the purchase price itself so the final price never goes
//!   negative.
//!
//! A percentage discount is *not* capped by the price: with a rate above 100
//! the raw value can exceed it. Rates are a data-entry invariant (0-100) and
//! deliberately not re-checked here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

/// How a promo code discounts a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountPolicy {
    /// Percentage of the purchase price (rate on a 0-100 scale).
    Percentage {
        rate: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_discount: Option<Money>,
    },
    /// Flat amount off the purchase price.
    Fixed {
        amount: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_discount: Option<Money>,
    },
}

impl DiscountPolicy {
    /// Creates an uncapped percentage discount.
    pub fn percentage(rate: Decimal) -> Self {
        DiscountPolicy::Percentage {
            rate,
            max_discount: None,
        }
    }

    /// Creates an uncapped fixed discount.
    pub fn fixed(amount: Money) -> Self {
        DiscountPolicy::Fixed {
            amount,
            max_discount: None,
        }
    }

    /// Sets the maximum discount cap.
    pub fn with_max_discount(self, cap: Money) -> Self {
        match self {
            DiscountPolicy::Percentage { rate, .. } => DiscountPolicy::Percentage {
                rate,
                max_discount: Some(cap),
            },
            DiscountPolicy::Fixed { amount, .. } => DiscountPolicy::Fixed {
                amount,
                max_discount: Some(cap),
            },
        }
    }

    /// Returns the max discount cap, if any.
    pub fn max_discount(&self) -> Option<Money> {
        match self {
            DiscountPolicy::Percentage { max_discount, .. }
            | DiscountPolicy::Fixed { max_discount, .. } => *max_discount,
        }
    }

    /// Computes the discount amount for a purchase price.
    pub fn discount_for(&self, price: Money) -> Money {
        match self {
            DiscountPolicy::Percentage { rate, max_discount } => {
                clamp_to_cap(price.percent(*rate), *max_discount)
            }
            DiscountPolicy::Fixed {
                amount,
                max_discount,
            } => clamp_to_cap(*amount, *max_discount).min(price),
        }
    }
}

/// Applies the shared max-discount ceiling.
fn clamp_to_cap(raw: Money, cap: Option<Money>) -> Money {
    match cap {
        Some(cap) => raw.min(cap),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Percentage Discounts
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn percentage_computes_share_of_price() {
        let policy = DiscountPolicy::percentage(dec!(20));
        assert_eq!(policy.discount_for(money(dec!(100))), money(dec!(20)));
    }

    #[test]
    fn percentage_is_capped_by_max_discount() {
        // SAVE20: 20% of 100 = 20, capped at 15.
        let policy = DiscountPolicy::percentage(dec!(20)).with_max_discount(money(dec!(15)));
        assert_eq!(policy.discount_for(money(dec!(100))), money(dec!(15)));
    }

    #[test]
    fn percentage_below_cap_is_untouched() {
        let policy = DiscountPolicy::percentage(dec!(10)).with_max_discount(money(dec!(15)));
        assert_eq!(policy.discount_for(money(dec!(100))), money(dec!(10)));
    }

    #[test]
    fn percentage_of_zero_price_is_zero() {
        let policy = DiscountPolicy::percentage(dec!(50));
        assert_eq!(policy.discount_for(Money::ZERO), Money::ZERO);
    }

    #[test]
    fn percentage_result_is_rounded_to_cents() {
        // 33% of 9.99 = 3.2967 -> 3.30
        let policy = DiscountPolicy::percentage(dec!(33));
        assert_eq!(policy.discount_for(money(dec!(9.99))), money(dec!(3.30)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Fixed Discounts
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn fixed_takes_flat_amount() {
        let policy = DiscountPolicy::fixed(money(dec!(5)));
        assert_eq!(policy.discount_for(money(dec!(100))), money(dec!(5)));
    }

    #[test]
    fn fixed_is_capped_by_price() {
        // FLAT50: 50 off a 30 purchase clamps to 30.
        let policy = DiscountPolicy::fixed(money(dec!(50)));
        assert_eq!(policy.discount_for(money(dec!(30))), money(dec!(30)));
    }

    #[test]
    fn fixed_is_capped_by_max_discount_then_price() {
        let policy = DiscountPolicy::fixed(money(dec!(50))).with_max_discount(money(dec!(40)));
        assert_eq!(policy.discount_for(money(dec!(100))), money(dec!(40)));
        assert_eq!(policy.discount_for(money(dec!(25))), money(dec!(25)));
    }

    #[test]
    fn fixed_never_exceeds_price_so_final_is_non_negative() {
        let policy = DiscountPolicy::fixed(money(dec!(50)));
        let price = money(dec!(30));
        let discount = policy.discount_for(price);
        assert_eq!(price - discount, Money::ZERO);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Serialization
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn policy_serializes_with_type_tag() {
        let policy = DiscountPolicy::percentage(dec!(20)).with_max_discount(money(dec!(15)));
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"type\":\"percentage\""));
    }

    #[test]
    fn policy_roundtrips_through_json() {
        let policy = DiscountPolicy::fixed(money(dec!(50)));
        let json = serde_json::to_string(&policy).unwrap();
        let back: DiscountPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }
}
