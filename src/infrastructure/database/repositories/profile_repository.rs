use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use crate::domain::{
    DeleteSummary, DocumentKind, DocumentSet, DomainError, DomainResult, NewProfileDto, Profile,
    ProfileFieldsUpdate, ProfileRepositoryInterface, Role, UpdateSummary,
};
use crate::infrastructure::database::entities::profile;

pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: profile::ProfileRole) -> Role {
    match role {
        profile::ProfileRole::User => Role::User,
        profile::ProfileRole::Admin => Role::Admin,
    }
}

fn domain_role_to_entity(role: Role) -> profile::ProfileRole {
    match role {
        Role::User => profile::ProfileRole::User,
        Role::Admin => profile::ProfileRole::Admin,
    }
}

fn profile_model_to_domain(model: profile::Model) -> Profile {
    Profile {
        id: model.id,
        email: model.email,
        name: model.name,
        nationality: model.nationality,
        mobilenumber: model.mobilenumber,
        department: model.department,
        program: model.program,
        roll: model.roll,
        session: model.session,
        role: entity_role_to_domain(model.role),
        documents: DocumentSet {
            passport: model.passport,
            visa: model.visa,
            image: model.image,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Stage `next` on `slot` if it differs from the stored value.
fn stage(slot: &mut ActiveValue<Option<String>>, current: &Option<String>, next: Option<String>) -> bool {
    match next {
        Some(value) if current.as_deref() != Some(value.as_str()) => {
            *slot = Set(Some(value));
            true
        }
        _ => false,
    }
}

// ── Repository implementation ───────────────────────────────────

impl ProfileRepository {
    async fn find_model_by_email(&self, email: &str) -> DomainResult<Option<profile::Model>> {
        Ok(profile::Entity::find()
            .filter(profile::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Persist `active` if anything was staged and report the outcome.
    async fn commit(&self, mut active: profile::ActiveModel, changed: bool) -> DomainResult<UpdateSummary> {
        if !changed {
            return Ok(UpdateSummary { matched: 1, modified: 0 });
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(UpdateSummary { matched: 1, modified: 1 })
    }
}

#[async_trait]
impl ProfileRepositoryInterface for ProfileRepository {
    async fn create_profile(&self, dto: NewProfileDto) -> DomainResult<Profile> {
        let now = Utc::now();

        let new_profile = profile::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(dto.email),
            name: Set(dto.name),
            nationality: Set(dto.nationality),
            mobilenumber: Set(dto.mobilenumber),
            department: Set(dto.department),
            program: Set(dto.program),
            roll: Set(dto.roll),
            session: Set(dto.session),
            role: Set(profile::ProfileRole::default()),
            passport: Set(None),
            visa: Set(None),
            image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_profile.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Profile with this email already exists".to_string())
            } else {
                DomainError::from(e)
            }
        })?;

        Ok(profile_model_to_domain(model))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
        let models = profile::Entity::find()
            .order_by_asc(profile::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(profile_model_to_domain).collect())
    }

    async fn get_profile_by_email(&self, email: &str) -> DomainResult<Option<Profile>> {
        Ok(self.find_model_by_email(email).await?.map(profile_model_to_domain))
    }

    async fn get_profile_by_id(&self, id: &str) -> DomainResult<Option<Profile>> {
        let model = profile::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(profile_model_to_domain))
    }

    async fn update_fields(&self, id: &str, update: ProfileFieldsUpdate) -> DomainResult<UpdateSummary> {
        let Some(existing) = profile::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(UpdateSummary::default());
        };

        let mut active: profile::ActiveModel = existing.clone().into();
        let mut changed = false;
        changed |= stage(&mut active.name, &existing.name, update.name);
        changed |= stage(&mut active.nationality, &existing.nationality, update.nationality);
        changed |= stage(&mut active.mobilenumber, &existing.mobilenumber, update.mobilenumber);
        changed |= stage(&mut active.department, &existing.department, update.department);
        changed |= stage(&mut active.program, &existing.program, update.program);
        changed |= stage(&mut active.roll, &existing.roll, update.roll);
        changed |= stage(&mut active.session, &existing.session, update.session);

        self.commit(active, changed).await
    }

    async fn set_role(&self, id: &str, role: Role) -> DomainResult<UpdateSummary> {
        let Some(existing) = profile::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(UpdateSummary::default());
        };

        let target = domain_role_to_entity(role);
        let changed = existing.role != target;
        let mut active: profile::ActiveModel = existing.into();
        if changed {
            active.role = Set(target);
        }

        self.commit(active, changed).await
    }

    async fn set_documents(&self, email: &str, documents: &DocumentSet) -> DomainResult<UpdateSummary> {
        let Some(existing) = self.find_model_by_email(email).await? else {
            return Ok(UpdateSummary::default());
        };

        let mut active: profile::ActiveModel = existing.clone().into();
        let mut changed = false;
        for kind in DocumentKind::ALL {
            let next = documents.get(kind).map(str::to_string);
            changed |= match kind {
                DocumentKind::Passport => stage(&mut active.passport, &existing.passport, next),
                DocumentKind::Visa => stage(&mut active.visa, &existing.visa, next),
                DocumentKind::Image => stage(&mut active.image, &existing.image, next),
            };
        }

        self.commit(active, changed).await
    }

    async fn delete_profile(&self, id: &str) -> DomainResult<DeleteSummary> {
        let result = profile::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(DeleteSummary {
            deleted: result.rows_affected,
        })
    }
}
