//! Profile service: application-layer orchestration

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    Capability, DeleteSummary, DocumentIntent, DocumentKind, DocumentSet, DomainError,
    DomainResult, NewProfileDto, Profile, ProfileFieldsUpdate, ProfileRepositoryInterface, Role,
    UpdateSummary,
};
use crate::infrastructure::storage::LocalDocumentStore;

/// A single uploaded file, already read from the request
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Profile service: orchestrates all profile use-cases.
///
/// Generic over `R: ProfileRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct ProfileService<R: ProfileRepositoryInterface> {
    repo: Arc<R>,
    documents: LocalDocumentStore,
}

impl<R: ProfileRepositoryInterface> ProfileService<R> {
    pub fn new(repo: Arc<R>, documents: LocalDocumentStore) -> Self {
        Self { repo, documents }
    }

    // ── Authorization ───────────────────────────────────────────

    /// Resolve the caller's profile and require `capability` on it.
    pub async fn authorize(&self, caller_email: Option<&str>, capability: Capability) -> DomainResult<Profile> {
        let Some(email) = caller_email else {
            return Err(DomainError::Forbidden("token carries no email".into()));
        };

        match self.repo.get_profile_by_email(email).await? {
            Some(profile) if profile.can(capability) => Ok(profile),
            _ => Err(DomainError::Forbidden("forbidden access".into())),
        }
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, mut dto: NewProfileDto) -> DomainResult<Profile> {
        dto.email = dto.email.trim().to_string();
        if dto.email.is_empty() {
            return Err(DomainError::Validation("email is required".into()));
        }

        if self.repo.get_profile_by_email(&dto.email).await?.is_some() {
            return Err(DomainError::Conflict("Profile with this email already exists".into()));
        }

        let profile = self.repo.create_profile(dto).await?;
        info!(profile_id = %profile.id, email = %profile.email, "New profile registered");
        Ok(profile)
    }

    // ── Self-service ────────────────────────────────────────────

    /// Profile lookup restricted to the caller's own email.
    pub async fn own_profile(&self, caller_email: Option<&str>, email: &str) -> DomainResult<Option<Profile>> {
        ensure_self(caller_email, email)?;
        self.repo.get_profile_by_email(email).await
    }

    /// Whether the caller's own profile carries admin rights.
    pub async fn is_admin(&self, caller_email: Option<&str>, email: &str) -> DomainResult<bool> {
        ensure_self(caller_email, email)?;
        let profile = self.repo.get_profile_by_email(email).await?;
        Ok(profile.is_some_and(|p| p.can(Capability::ManageProfiles)))
    }

    pub async fn update_fields(&self, id: &str, update: ProfileFieldsUpdate) -> DomainResult<UpdateSummary> {
        let summary = self.repo.update_fields(id, update).await?;
        info!(
            profile_id = %id,
            matched = summary.matched,
            modified = summary.modified,
            "Profile fields updated"
        );
        Ok(summary)
    }

    /// Store the uploaded files and record their names on the profile.
    ///
    /// Files written by this call are removed again when the profile does
    /// not exist or the update fails. With [`DocumentIntent::Replace`] the
    /// files the new ones supersede are removed after a successful update.
    pub async fn set_documents(
        &self,
        email: &str,
        uploads: Vec<DocumentUpload>,
        intent: DocumentIntent,
    ) -> DomainResult<UpdateSummary> {
        if uploads.is_empty() {
            return Err(DomainError::Validation(
                "at least one of passport, visa or image is required".into(),
            ));
        }

        let previous = match intent {
            DocumentIntent::Replace => self
                .repo
                .get_profile_by_email(email)
                .await?
                .map(|p| p.documents),
            DocumentIntent::Create => None,
        };

        self.documents.ensure_root().await?;

        let mut written = Vec::with_capacity(uploads.len());
        let mut next = DocumentSet::default();
        for upload in uploads {
            match self.documents.save(upload.file_name.as_deref(), &upload.data).await {
                Ok(filename) => {
                    written.push(filename.clone());
                    next.set(upload.kind, filename);
                }
                Err(e) => {
                    self.documents.discard(&written).await;
                    return Err(e.into());
                }
            }
        }

        let summary = match self.repo.set_documents(email, &next).await {
            Ok(summary) => summary,
            Err(e) => {
                self.documents.discard(&written).await;
                return Err(e);
            }
        };

        if summary.matched == 0 {
            warn!(email = %email, "Documents uploaded for unknown profile; discarding files");
            self.documents.discard(&written).await;
            return Ok(summary);
        }

        if let Some(previous) = previous {
            self.documents.discard(&previous.superseded_by(&next)).await;
        }

        info!(
            email = %email,
            intent = ?intent,
            passport = ?next.passport,
            visa = ?next.visa,
            image = ?next.image,
            "Profile documents recorded"
        );
        Ok(summary)
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
        self.repo.list_profiles().await
    }

    pub async fn get_profile(&self, id: &str) -> DomainResult<Option<Profile>> {
        self.repo.get_profile_by_id(id).await
    }

    pub async fn promote_to_admin(&self, id: &str) -> DomainResult<UpdateSummary> {
        let summary = self.repo.set_role(id, Role::Admin).await?;
        if summary.modified > 0 {
            info!(profile_id = %id, "Profile promoted to admin");
        }
        Ok(summary)
    }

    pub async fn delete_profile(&self, id: &str) -> DomainResult<DeleteSummary> {
        let summary = self.repo.delete_profile(id).await?;
        if summary.deleted > 0 {
            info!(profile_id = %id, "Profile deleted");
        }
        Ok(summary)
    }

    /// Make sure a profile for `email` exists and holds the admin role.
    pub async fn bootstrap_admin(&self, email: &str) -> DomainResult<Profile> {
        let profile = match self.repo.get_profile_by_email(email).await? {
            Some(profile) => profile,
            None => {
                self.register(NewProfileDto {
                    email: email.to_string(),
                    ..NewProfileDto::default()
                })
                .await?
            }
        };

        if profile.role != Role::Admin {
            self.repo.set_role(&profile.id, Role::Admin).await?;
            info!(email = %email, "Bootstrap admin promoted");
        }

        self.repo
            .get_profile_by_id(&profile.id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Profile",
                field: "id",
                value: profile.id.clone(),
            })
    }
}

fn ensure_self(caller_email: Option<&str>, email: &str) -> DomainResult<()> {
    if caller_email == Some(email) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("forbidden access".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::ProfileRepository;
    use crate::test_support::TestEnv;

    async fn service(env: &TestEnv) -> ProfileService<ProfileRepository> {
        ProfileService::new(
            Arc::new(ProfileRepository::new(env.db.clone())),
            LocalDocumentStore::new(env.documents_dir()),
        )
    }

    fn new_profile(email: &str) -> NewProfileDto {
        NewProfileDto {
            email: email.to_string(),
            name: Some("Ana Silva".into()),
            nationality: Some("Brazil".into()),
            roll: Some("1907".into()),
            ..NewProfileDto::default()
        }
    }

    fn upload(kind: DocumentKind, name: &str, data: &[u8]) -> DocumentUpload {
        DocumentUpload {
            kind,
            file_name: Some(name.to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;

        let created = svc.register(new_profile("ana@example.com")).await.unwrap();
        assert_eq!(created.role, Role::User);

        let err = svc.register(new_profile("ana@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        env.cleanup().await;
    }

    #[tokio::test]
    async fn register_requires_email() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;

        let err = svc.register(new_profile("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        env.cleanup().await;
    }

    #[tokio::test]
    async fn own_profile_requires_matching_email() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        svc.register(new_profile("ana@example.com")).await.unwrap();

        let own = svc
            .own_profile(Some("ana@example.com"), "ana@example.com")
            .await
            .unwrap();
        assert_eq!(own.unwrap().name.as_deref(), Some("Ana Silva"));

        let err = svc
            .own_profile(Some("bo@example.com"), "ana@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = svc.own_profile(None, "ana@example.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        env.cleanup().await;
    }

    #[tokio::test]
    async fn authorize_requires_admin_profile() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        let ana = svc.register(new_profile("ana@example.com")).await.unwrap();

        assert!(svc
            .authorize(Some("ana@example.com"), Capability::ManageProfiles)
            .await
            .is_err());
        assert!(svc
            .authorize(Some("ghost@example.com"), Capability::ManageOwnProfile)
            .await
            .is_err());

        let summary = svc.promote_to_admin(&ana.id).await.unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 1 });
        let admin = svc
            .authorize(Some("ana@example.com"), Capability::ManageProfiles)
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(svc.is_admin(Some("ana@example.com"), "ana@example.com").await.unwrap());

        let again = svc.promote_to_admin(&ana.id).await.unwrap();
        assert_eq!(again, UpdateSummary { matched: 1, modified: 0 });

        env.cleanup().await;
    }

    #[tokio::test]
    async fn update_fields_touches_only_given_fields() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        let ana = svc.register(new_profile("ana@example.com")).await.unwrap();

        let summary = svc
            .update_fields(
                &ana.id,
                ProfileFieldsUpdate {
                    department: Some("CSE".into()),
                    ..ProfileFieldsUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 1 });

        let stored = svc.get_profile(&ana.id).await.unwrap().unwrap();
        assert_eq!(stored.department.as_deref(), Some("CSE"));
        assert_eq!(stored.name.as_deref(), Some("Ana Silva"));
        assert_eq!(stored.nationality.as_deref(), Some("Brazil"));

        let missing = svc
            .update_fields("no-such-id", ProfileFieldsUpdate::default())
            .await
            .unwrap();
        assert_eq!(missing, UpdateSummary::default());

        env.cleanup().await;
    }

    #[tokio::test]
    async fn documents_for_unknown_profile_leave_no_files() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;

        let summary = svc
            .set_documents(
                "ghost@example.com",
                vec![upload(DocumentKind::Passport, "p.pdf", b"p")],
                DocumentIntent::Create,
            )
            .await
            .unwrap();
        assert_eq!(summary.matched, 0);

        let mut entries = tokio::fs::read_dir(env.documents_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        env.cleanup().await;
    }

    /// Repository whose document update always fails.
    struct BrokenDocumentsRepo;

    #[async_trait::async_trait]
    impl ProfileRepositoryInterface for BrokenDocumentsRepo {
        async fn create_profile(&self, _dto: NewProfileDto) -> DomainResult<Profile> {
            unimplemented!()
        }
        async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
            unimplemented!()
        }
        async fn get_profile_by_email(&self, _email: &str) -> DomainResult<Option<Profile>> {
            Ok(None)
        }
        async fn get_profile_by_id(&self, _id: &str) -> DomainResult<Option<Profile>> {
            Ok(None)
        }
        async fn update_fields(&self, _id: &str, _update: ProfileFieldsUpdate) -> DomainResult<UpdateSummary> {
            unimplemented!()
        }
        async fn set_role(&self, _id: &str, _role: Role) -> DomainResult<UpdateSummary> {
            unimplemented!()
        }
        async fn set_documents(&self, _email: &str, _documents: &DocumentSet) -> DomainResult<UpdateSummary> {
            Err(DomainError::Storage("database is locked".into()))
        }
        async fn delete_profile(&self, _id: &str) -> DomainResult<DeleteSummary> {
            unimplemented!()
        }
    }

    fn stored_files(env: &TestEnv) -> usize {
        std::fs::read_dir(env.documents_dir()).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn failed_document_update_removes_written_files() {
        let env = TestEnv::new().await;
        let svc = ProfileService::new(
            Arc::new(BrokenDocumentsRepo),
            LocalDocumentStore::new(env.documents_dir()),
        );

        let err = svc
            .set_documents(
                "ana@example.com",
                vec![
                    upload(DocumentKind::Passport, "passport.pdf", b"p"),
                    upload(DocumentKind::Image, "me.png", b"i"),
                ],
                DocumentIntent::Create,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(stored_files(&env), 0);

        env.cleanup().await;
    }

    #[tokio::test]
    async fn failed_save_removes_earlier_files() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        svc.register(new_profile("ana@example.com")).await.unwrap();

        // Longer than any single path component the filesystem accepts.
        let too_long = format!("{}.pdf", "v".repeat(300));
        let err = svc
            .set_documents(
                "ana@example.com",
                vec![
                    upload(DocumentKind::Passport, "passport.pdf", b"p"),
                    upload(DocumentKind::Visa, &too_long, b"v"),
                ],
                DocumentIntent::Create,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Io(_)));
        assert_eq!(stored_files(&env), 0);

        let profile = svc
            .own_profile(Some("ana@example.com"), "ana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(profile.documents.passport.is_none());

        env.cleanup().await;
    }

    #[tokio::test]
    async fn replace_removes_superseded_files() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        svc.register(new_profile("ana@example.com")).await.unwrap();

        svc.set_documents(
            "ana@example.com",
            vec![
                upload(DocumentKind::Passport, "passport.pdf", b"old passport"),
                upload(DocumentKind::Visa, "visa.pdf", b"visa"),
            ],
            DocumentIntent::Create,
        )
        .await
        .unwrap();
        let before = svc
            .own_profile(Some("ana@example.com"), "ana@example.com")
            .await
            .unwrap()
            .unwrap()
            .documents;

        let summary = svc
            .set_documents(
                "ana@example.com",
                vec![upload(DocumentKind::Passport, "passport.pdf", b"new passport")],
                DocumentIntent::Replace,
            )
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 1 });

        let after = svc
            .own_profile(Some("ana@example.com"), "ana@example.com")
            .await
            .unwrap()
            .unwrap()
            .documents;
        assert_ne!(after.passport, before.passport);
        assert_eq!(after.visa, before.visa);

        let root = env.documents_dir();
        assert!(!root.join(before.passport.unwrap()).exists());
        assert!(root.join(after.passport.unwrap()).exists());
        assert!(root.join(after.visa.unwrap()).exists());

        env.cleanup().await;
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;

        let err = svc
            .set_documents("ana@example.com", Vec::new(), DocumentIntent::Create)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        env.cleanup().await;
    }

    #[tokio::test]
    async fn bootstrap_admin_creates_and_promotes() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;

        let admin = svc.bootstrap_admin("root@example.com").await.unwrap();
        assert_eq!(admin.role, Role::Admin);

        let again = svc.bootstrap_admin("root@example.com").await.unwrap();
        assert_eq!(again.id, admin.id);
        assert_eq!(svc.list_profiles().await.unwrap().len(), 1);

        env.cleanup().await;
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let env = TestEnv::new().await;
        let svc = service(&env).await;
        let ana = svc.register(new_profile("ana@example.com")).await.unwrap();

        assert_eq!(svc.delete_profile(&ana.id).await.unwrap().deleted, 1);
        assert_eq!(svc.delete_profile(&ana.id).await.unwrap().deleted, 0);
        assert!(svc.get_profile(&ana.id).await.unwrap().is_none());

        env.cleanup().await;
    }
}
