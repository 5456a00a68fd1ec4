//! Database entities module

pub mod profile;

pub use profile::Entity as Profile;
