//! Profile module: registration, self-service and admin use cases
//!
//! `ProfileService` owns every profile rule (self-lookup checks, capability
//! checks, document bookkeeping). HTTP handlers stay thin wrappers.

pub mod service;

pub use service::{DocumentUpload, ProfileService};
