//! Token issuance: `POST /jwt`

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
