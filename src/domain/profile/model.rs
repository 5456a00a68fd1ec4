//! Profile domain model

use chrono::{DateTime, Utc};

/// Access role stored on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Action classes gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read and edit the caller's own profile and documents.
    ManageOwnProfile,
    /// Read, list, promote and delete any profile.
    ManageProfiles,
}

impl Role {
    pub fn allows(self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, _) => true,
            (Role::User, Capability::ManageOwnProfile) => true,
            (Role::User, Capability::ManageProfiles) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Kinds of identity documents a profile can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Passport,
    Visa,
    Image,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Passport, DocumentKind::Visa, DocumentKind::Image];

    /// Multipart field name carrying this document.
    pub fn field_name(self) -> &'static str {
        match self {
            DocumentKind::Passport => "passport",
            DocumentKind::Visa => "visa",
            DocumentKind::Image => "image",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field_name() == name)
    }
}

/// Whether an upload records documents for the first time or replaces them.
///
/// Both intents write the same columns; `Replace` additionally removes the
/// superseded files from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentIntent {
    Create,
    Replace,
}

/// Stored document filenames, one slot per [`DocumentKind`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    pub passport: Option<String>,
    pub visa: Option<String>,
    pub image: Option<String>,
}

impl DocumentSet {
    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Passport => self.passport.as_deref(),
            DocumentKind::Visa => self.visa.as_deref(),
            DocumentKind::Image => self.image.as_deref(),
        }
    }

    pub fn set(&mut self, kind: DocumentKind, filename: String) {
        let slot = match kind {
            DocumentKind::Passport => &mut self.passport,
            DocumentKind::Visa => &mut self.visa,
            DocumentKind::Image => &mut self.image,
        };
        *slot = Some(filename);
    }

    /// Filenames in `self` that `next` overwrites with a different name.
    pub fn superseded_by(&self, next: &DocumentSet) -> Vec<String> {
        DocumentKind::ALL
            .into_iter()
            .filter_map(|kind| match (self.get(kind), next.get(kind)) {
                (Some(old), Some(new)) if old != new => Some(old.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Student profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub mobilenumber: Option<String>,
    pub department: Option<String>,
    pub program: Option<String>,
    pub roll: Option<String>,
    pub session: Option<String>,
    pub role: Role,
    pub documents: DocumentSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_manages_other_profiles() {
        assert!(Role::Admin.allows(Capability::ManageProfiles));
        assert!(Role::Admin.allows(Capability::ManageOwnProfile));
        assert!(Role::User.allows(Capability::ManageOwnProfile));
        assert!(!Role::User.allows(Capability::ManageProfiles));
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::default().as_str(), "user");
    }

    #[test]
    fn document_kind_from_field_name() {
        assert_eq!(DocumentKind::from_field_name("visa"), Some(DocumentKind::Visa));
        assert_eq!(DocumentKind::from_field_name("photo"), None);
    }

    #[test]
    fn superseded_only_lists_changed_slots() {
        let old = DocumentSet {
            passport: Some("1a.pdf".into()),
            visa: Some("1b.pdf".into()),
            image: None,
        };
        let next = DocumentSet {
            passport: Some("2a.pdf".into()),
            visa: Some("1b.pdf".into()),
            image: Some("2c.png".into()),
        };
        assert_eq!(old.superseded_by(&next), vec!["1a.pdf".to_string()]);
    }
}
