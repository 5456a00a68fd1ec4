//! Profile DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DeleteSummary, NewProfileDto, Profile, ProfileFieldsUpdate, UpdateSummary};

/// Profile API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobilenumber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// `user` or `admin`
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            name: p.name,
            nationality: p.nationality,
            mobilenumber: p.mobilenumber,
            department: p.department,
            program: p.program,
            roll: p.roll,
            session: p.session,
            role: p.role.as_str().to_string(),
            passport: p.documents.passport,
            visa: p.documents.visa,
            image: p.documents.image,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Accept strings and numbers alike; forms post `roll: 17` as often as
/// `roll: "17"`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// Registration body. Unknown keys (including `role`) are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfileRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 32))]
    pub mobilenumber: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub program: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 64))]
    pub roll: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 64))]
    pub session: Option<String>,
}

impl From<CreateProfileRequest> for NewProfileDto {
    fn from(r: CreateProfileRequest) -> Self {
        Self {
            email: r.email,
            name: r.name,
            nationality: r.nationality,
            mobilenumber: r.mobilenumber,
            department: r.department,
            program: r.program,
            roll: r.roll,
            session: r.session,
        }
    }
}

/// Partial update body. Only these keys are read; everything else in the
/// body is dropped by serde.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 32))]
    pub mobilenumber: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 200))]
    pub program: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 64))]
    pub roll: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(max = 64))]
    pub session: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileFieldsUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name,
            nationality: r.nationality,
            mobilenumber: r.mobilenumber,
            department: r.department,
            program: r.program,
            roll: r.roll,
            session: r.session,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResultDto {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResultDto {
    pub fn new(inserted_id: String) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultDto {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl From<UpdateSummary> for UpdateResultDto {
    fn from(s: UpdateSummary) -> Self {
        Self {
            acknowledged: true,
            matched_count: s.matched,
            modified_count: s.modified,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResultDto {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteSummary> for DeleteResultDto {
    fn from(s: DeleteSummary) -> Self {
        Self {
            acknowledged: true,
            deleted_count: s.deleted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminStatusDto {
    pub admin: bool,
}
