//! Application layer - profile use cases

pub mod profiles;

pub use profiles::{DocumentUpload, ProfileService};
