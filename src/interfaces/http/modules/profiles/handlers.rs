//! Profile API handlers
//!
//! Thin adapters over `ProfileService`. Unknown ids and emails are not
//! errors here: reads answer `null` and writes report zero counts.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{
    AdminStatusDto, CreateProfileRequest, DeleteResultDto, InsertResultDto, ProfileDto,
    UpdateProfileRequest, UpdateResultDto,
};
use crate::interfaces::http::common::{ApiError, ErrorResponse, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, SharedProfileService};

/// Profile handler state: concrete over `ProfileRepository` for Axum compatibility.
#[derive(Clone)]
pub struct ProfileHandlerState {
    pub profiles: SharedProfileService,
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 200, description = "Profile created", body = InsertResultDto),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_profile(
    State(state): State<ProfileHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateProfileRequest>,
) -> Result<Json<InsertResultDto>, ApiError> {
    let profile = state.profiles.register(request.into()).await?;
    Ok(Json(InsertResultDto::new(profile.id)))
}

#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("email" = String, Path, description = "Caller's own email")),
    responses(
        (status = 200, description = "Admin flag", body = AdminStatusDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Email is not the caller's", body = ErrorResponse)
    )
)]
pub async fn check_admin(
    State(state): State<ProfileHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatusDto>, ApiError> {
    let admin = state.profiles.is_admin(user.email(), &email).await?;
    Ok(Json(AdminStatusDto { admin }))
}

#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("email" = String, Path, description = "Caller's own email")),
    responses(
        (status = 200, description = "Profile, or null when none exists", body = Option<ProfileDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Email is not the caller's", body = ErrorResponse)
    )
)]
pub async fn get_own_profile(
    State(state): State<ProfileHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(email): Path<String>,
) -> Result<Json<Option<ProfileDto>>, ApiError> {
    let profile = state.profiles.own_profile(user.email(), &email).await?;
    Ok(Json(profile.map(ProfileDto::from)))
}

#[utoipa::path(
    patch,
    path = "/user/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Update summary", body = UpdateResultDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<ProfileHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UpdateResultDto>, ApiError> {
    let summary = state.profiles.update_fields(&id, request.into()).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/user/admin/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile, or null when none exists", body = Option<ProfileDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn get_profile_by_id(
    State(state): State<ProfileHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ProfileDto>>, ApiError> {
    let profile = state.profiles.get_profile(&id).await?;
    Ok(Json(profile.map(ProfileDto::from)))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every profile", body = Vec<ProfileDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_profiles(
    State(state): State<ProfileHandlerState>,
) -> Result<Json<Vec<ProfileDto>>, ApiError> {
    let profiles = state.profiles.list_profiles().await?;
    Ok(Json(profiles.into_iter().map(ProfileDto::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Update summary", body = UpdateResultDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn promote_profile(
    State(state): State<ProfileHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResultDto>, ApiError> {
    let summary = state.profiles.promote_to_admin(&id).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Delete summary", body = DeleteResultDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn delete_profile(
    State(state): State<ProfileHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResultDto>, ApiError> {
    let summary = state.profiles.delete_profile(&id).await?;
    Ok(Json(summary.into()))
}
