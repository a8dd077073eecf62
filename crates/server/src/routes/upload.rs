//! Image upload proxy handler.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::uploads::{self, MAX_FILE_BYTES, MAX_FILES, UploadedFiles};
use crate::state::AppState;

/// Build the upload router.
///
/// The body limit leaves headroom over the per-file cap for the multipart
/// framing around a full batch.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(MAX_FILES * MAX_FILE_BYTES + 64 * 1024))
}

/// Accept up to five images under the `images` field and forward them to
/// the image host.
///
/// # Errors
///
/// `Validation` for an empty batch, too many files, an unsupported type or
/// an oversized file; `Upstream` when the image host fails.
pub async fn upload(
    State(state): State<AppState>,
    _caller: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadedFiles>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }
        if files.len() == MAX_FILES {
            return Err(AppError::Validation(format!(
                "at most {MAX_FILES} files per upload"
            )));
        }

        let name = field.file_name().unwrap_or("unnamed").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read {name}: {e}")))?;

        uploads::validate_file(&name, bytes.len())?;
        files.push((name, bytes.to_vec()));
    }

    let uploaded = state.image_host().upload(files).await?;
    Ok(Json(uploaded))
}
