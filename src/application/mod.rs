//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers
//! (read).

pub mod handlers;

pub use handlers::{
    // Promo code handlers
    ApplyCodeCommand, ApplyCodeHandler,
    CreateCodeCommand, CreateCodeHandler,
    DeleteCodeCommand, DeleteCodeHandler,
    ListCodesHandler,
    UpdateCodeCommand, UpdateCodeHandler,
    ValidateCodeHandler, ValidateCodeQuery,
    // Agency handlers
    AgencyDashboard,
    CreateAgencyCommand, CreateAgencyHandler,
    GetAgencyDashboardHandler, GetAgencyDashboardQuery,
    UpdateAgencyCommand, UpdateAgencyHandler,
};
