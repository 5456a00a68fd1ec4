//! HTTP REST API interfaces
//!
//! - `common`: error body and validated JSON extractor
//! - `middleware`: token and admin authorization middleware
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
