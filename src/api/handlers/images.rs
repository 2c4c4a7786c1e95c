use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::BytesMut;
use serde::Serialize;

use crate::api::response::{ApiError, Listing, WithMessage};
use crate::pipeline::{IncomingFile, UploadError};
use crate::store::ImageView;
use crate::AppState;

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DeletedImage {
    pub id: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_images(State(state): State<Arc<AppState>>) -> Json<Listing<ImageView>> {
    Listing::json(state.store.get_all())
}

/// Serve the raw bytes of an image.
/// Route: GET /images/:id
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let image = parse_id(&id)
        .and_then(|id| state.store.get(id))
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    let mut response = (StatusCode::OK, image.data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(image.mime_type.as_str()),
    );
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(image.size));
    // Image bytes never change once uploaded
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}

/// Accept a multipart upload whose `image` field holds a JPEG or PNG.
///
/// The part's type is checked before any of its bytes are read, and the
/// size cap is enforced chunk by chunk while buffering.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<WithMessage<ImageView>>), ApiError> {
    let limit = state.pipeline.max_upload_size();
    let mut upload: Option<IncomingFile> = None;

    // A request that is not multipart at all carries no file
    if let Ok(mut multipart) = multipart {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            if field.name() != Some(IMAGE_FIELD) || upload.is_some() {
                continue;
            }
            // A plain form value under the same name carries no file
            let Some(filename) = field.file_name().map(|s| s.to_string()) else {
                continue;
            };

            let content_type = field.content_type().map(|s| s.to_string());
            state.pipeline.resolve_type(content_type.as_deref())?;

            let mut buf = BytesMut::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| multipart_error(e, limit))?
            {
                state
                    .pipeline
                    .check_size((buf.len() + chunk.len()) as u64)?;
                buf.extend_from_slice(&chunk);
            }

            upload = Some(IncomingFile {
                filename: Some(filename),
                content_type,
                data: buf.freeze(),
            });
        }
    }

    let image = state.pipeline.process(upload).await?;

    Ok((
        StatusCode::CREATED,
        WithMessage::json(image, "Image uploaded successfully"),
    ))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WithMessage<DeletedImage>>, ApiError> {
    let removed = parse_id(&id)
        .and_then(|id| state.store.delete(id))
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    tracing::info!(
        id = removed.id,
        filename = %removed.filename,
        total_images = state.store.count(),
        "Image deleted"
    );

    Ok(WithMessage::json(
        DeletedImage { id: removed.id },
        "Image deleted successfully",
    ))
}

// ============================================================================
// Helpers
// ============================================================================

/// Path ids that are not positive integers match nothing.
fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

fn multipart_error(e: MultipartError, limit: u64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::FileTooLarge { limit }.into();
    }
    ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
}
