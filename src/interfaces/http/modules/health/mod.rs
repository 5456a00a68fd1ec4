//! Liveness banner and health report

pub mod handlers;

pub use handlers::*;
