//! # LiveColab
//!
//! HTTP backend for the LiveColab frontend: issues JWTs, stores user
//! profiles with a role, and keeps passport, visa and photo uploads on disk.
//!
//! ## Architecture
//!
//! - **domain**: profile model, roles and the repository port
//! - **application**: `ProfileService` use cases
//! - **infrastructure**: SeaORM persistence, JWT signing, document storage
//! - **interfaces**: axum router, middleware and handlers
//! - **shared**: errors and shutdown coordination
//! - **server**: process lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
