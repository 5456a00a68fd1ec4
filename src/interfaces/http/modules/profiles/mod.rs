//! Profiles module: registration, self-service and admin management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
