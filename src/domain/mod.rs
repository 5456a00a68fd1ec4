//! Domain layer: the profile aggregate, its roles and the repository port

pub mod profile;

pub use profile::{
    Capability, DeleteSummary, DocumentIntent, DocumentKind, DocumentSet, NewProfileDto,
    Profile, ProfileFieldsUpdate, ProfileRepositoryInterface, Role, UpdateSummary,
};

pub use crate::shared::errors::{DomainError, DomainResult};
