//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod agency;
pub mod promo;

pub use agency::{
    AgencyDashboard, CreateAgencyCommand, CreateAgencyHandler, GetAgencyDashboardHandler,
    GetAgencyDashboardQuery, UpdateAgencyCommand, UpdateAgencyHandler,
};
pub use promo::{
    ApplyCodeCommand, ApplyCodeHandler, CreateCodeCommand, CreateCodeHandler, DeleteCodeCommand,
    DeleteCodeHandler, ListCodesHandler, UpdateCodeCommand, UpdateCodeHandler, ValidateCodeHandler,
    ValidateCodeQuery,
};
