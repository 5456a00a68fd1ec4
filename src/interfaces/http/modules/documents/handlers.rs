//! Document upload handlers
//!
//! Both routes read the same multipart form and call
//! `ProfileService::set_documents`; only the intent differs.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use tracing::debug;
use utoipa::ToSchema;

use crate::application::DocumentUpload;
use crate::domain::{DocumentIntent, DocumentKind};
use crate::interfaces::http::common::{ApiError, ErrorResponse};
use crate::interfaces::http::modules::profiles::{ProfileHandlerState, UpdateResultDto};

/// Multipart form accepted by both upload routes (documentation only)
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct DocumentsForm {
    #[schema(value_type = Option<String>, format = Binary)]
    pub passport: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub visa: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Collect the `passport`, `visa` and `image` file parts.
///
/// Plain text parts are skipped. A file part under any other name, or a
/// second file for the same name, rejects the whole form.
async fn read_uploads(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<DocumentUpload>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    let mut uploads: Vec<DocumentUpload> = Vec::with_capacity(DocumentKind::ALL.len());
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        // Parts without a filename are plain form values, even under a document name.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!(field = %name, "Skipping non-file form field");
            continue;
        };

        let Some(kind) = DocumentKind::from_field_name(&name) else {
            return Err(ApiError::bad_request(format!("Unexpected file field '{}'", name)));
        };

        if uploads.iter().any(|u| u.kind == kind) {
            return Err(ApiError::bad_request(format!(
                "Field '{}' accepts a single file",
                name
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        uploads.push(DocumentUpload {
            kind,
            file_name: Some(file_name),
            data: data.to_vec(),
        });
    }

    Ok(uploads)
}

#[utoipa::path(
    post,
    path = "/upload-files/{email}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("email" = String, Path, description = "Email of the profile to attach files to")),
    request_body(content = DocumentsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update summary", body = UpdateResultDto),
        (status = 400, description = "Malformed form or no files", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn upload_documents(
    State(state): State<ProfileHandlerState>,
    Path(email): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UpdateResultDto>, ApiError> {
    let uploads = read_uploads(multipart).await?;
    let summary = state
        .profiles
        .set_documents(&email, uploads, DocumentIntent::Create)
        .await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    put,
    path = "/update-files/{email}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("email" = String, Path, description = "Email of the profile whose files are replaced")),
    request_body(content = DocumentsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update summary", body = UpdateResultDto),
        (status = 400, description = "Malformed form or no files", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn replace_documents(
    State(state): State<ProfileHandlerState>,
    Path(email): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UpdateResultDto>, ApiError> {
    let uploads = read_uploads(multipart).await?;
    let summary = state
        .profiles
        .set_documents(&email, uploads, DocumentIntent::Replace)
        .await?;
    Ok(Json(summary.into()))
}
