//! Agency application handlers.
//!
//! Command and query handlers for agency registration, edits and reporting.

mod create_agency;
mod get_agency_dashboard;
mod update_agency;

pub use create_agency::{CreateAgencyCommand, CreateAgencyHandler};
pub use get_agency_dashboard::{
    AgencyDashboard, GetAgencyDashboardHandler, GetAgencyDashboardQuery,
};
pub use update_agency::{UpdateAgencyCommand, UpdateAgencyHandler};
