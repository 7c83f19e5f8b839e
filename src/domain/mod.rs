//! Domain layer - entities, value objects, and business rules.

pub mod agency;
pub mod foundation;
pub mod promo;
