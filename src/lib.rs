//! Promo Desk - Promotional Code and Referral Back-Office
//!
//! This crate implements the promo-code engine behind an administrative
//! back-office: validating codes against a purchase, computing discounts,
//! recording redemptions, and accruing commission for agency referrals.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
