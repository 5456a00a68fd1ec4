//! Document uploads: passport, visa and photo files per profile

pub mod handlers;

pub use handlers::*;
