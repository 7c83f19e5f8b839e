//! Promo code application handlers.
//!
//! Command and query handlers for code lifecycle, validation and redemption.

mod apply_code;
mod create_code;
mod delete_code;
mod list_codes;
mod update_code;
mod validate_code;

pub use apply_code::{ApplyCodeCommand, ApplyCodeHandler};
pub use create_code::{CreateCodeCommand, CreateCodeHandler};
pub use delete_code::{DeleteCodeCommand, DeleteCodeHandler};
pub use list_codes::ListCodesHandler;
pub use update_code::{UpdateCodeCommand, UpdateCodeHandler};
pub use validate_code::{ValidateCodeHandler, ValidateCodeQuery};
