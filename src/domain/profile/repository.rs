use async_trait::async_trait;

use super::{DocumentSet, NewProfileDto, Profile, ProfileFieldsUpdate, Role};
use crate::domain::DomainResult;

/// Outcome of an update addressed by id or email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Rows matched by the filter (0 or 1).
    pub matched: u64,
    /// Rows whose stored values actually changed.
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: u64,
}

#[async_trait]
pub trait ProfileRepositoryInterface: Send + Sync {
    async fn create_profile(&self, dto: NewProfileDto) -> DomainResult<Profile>;

    async fn list_profiles(&self) -> DomainResult<Vec<Profile>>;
    async fn get_profile_by_email(&self, email: &str) -> DomainResult<Option<Profile>>;
    async fn get_profile_by_id(&self, id: &str) -> DomainResult<Option<Profile>>;

    async fn update_fields(&self, id: &str, update: ProfileFieldsUpdate) -> DomainResult<UpdateSummary>;
    async fn set_role(&self, id: &str, role: Role) -> DomainResult<UpdateSummary>;
    /// Writes only the populated slots of `documents`.
    async fn set_documents(&self, email: &str, documents: &DocumentSet) -> DomainResult<UpdateSummary>;
    async fn delete_profile(&self, id: &str) -> DomainResult<DeleteSummary>;
}
