//! Agency domain module.

mod agency;

pub use agency::{Agency, AgencyPatch, AgencyStatus, CommissionCredit, NewAgency};
