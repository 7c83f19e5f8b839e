//! Promo code domain module.
//!
//! # Module Structure
//!
//! - `code_key` - normalized (uppercase) promo code string
//! - `code` - PromoCode entity and write models
//! - `discount` - percentage/fixed discount policy
//! - `validation` - validation and application result types
//! - `usage` - immutable usage ledger records

mod code;
mod code_key;
mod discount;
mod usage;
mod validation;

pub use code::{NewPromoCode, PromoCode, PromoCodePatch, PromoCodeStatus, PromoCodeType};
pub use code_key::CodeKey;
pub use discount::DiscountPolicy;
pub use usage::{NewUsage, PromoCodeUsage};
pub use validation::{Application, RejectionReason, Validation};
