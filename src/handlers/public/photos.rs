// handlers/public/photos.rs - POST /api/photos handler

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded file
pub const PHOTO_FIELD: &str = "photo";

/// Multipart framing allowance on top of the file size limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadedPhoto {
    pub path: String,
}

/// POST /api/photos - store the `photo` file under a random name
///
/// Other fields are skipped. The stored name is 32 hex characters with no
/// extension and the content type is not checked.
pub async fn upload_photo(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<UploadedPhoto>> {
    let uploads = &state.config.uploads;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) || field.file_name().is_none() {
            continue;
        }

        let data = field.bytes().await?;
        if data.len() > uploads.max_file_size_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "photo exceeds {} bytes",
                uploads.max_file_size_bytes
            )));
        }

        let name = Uuid::new_v4().simple().to_string();
        tokio::fs::create_dir_all(&uploads.dir).await?;
        tokio::fs::write(uploads.dir.join(&name), &data).await?;

        tracing::info!("Stored photo {} ({} bytes)", name, data.len());
        return Ok(Json(UploadedPhoto {
            path: format!("{}/{}", uploads.public_path.trim_end_matches('/'), name),
        }));
    }

    Err(ApiError::bad_request("a photo file is required"))
}
