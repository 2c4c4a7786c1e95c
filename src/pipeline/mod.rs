//! Upload pipeline: ingress validation, dimension derivation, commit.

mod probe;

pub use probe::{DimensionProbe, ProbeError, SimulatedProbe, SIMULATED_HEIGHT, SIMULATED_WIDTH};

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::store::{ImageMime, ImageStore, ImageView};

const MIB: u64 = 1024 * 1024;

/// Filename recorded when the client does not send one
const DEFAULT_FILENAME: &str = "upload";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Only JPEG and PNG images are allowed!")]
    UnsupportedType(String),
    #[error("File size too large. Maximum {} allowed.", describe_limit(.limit))]
    FileTooLarge { limit: u64 },
    #[error("Failed to upload image")]
    Internal(String),
}

impl UploadError {
    /// True for errors the client can correct by changing the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Internal(_))
    }
}

fn describe_limit(limit: &u64) -> String {
    let limit = *limit;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit} bytes")
    }
}

/// A file part as received from the client, before validation.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

pub struct UploadPipeline {
    store: ImageStore,
    probe: Arc<dyn DimensionProbe>,
    max_upload_size: u64,
}

impl UploadPipeline {
    pub fn new(store: ImageStore, probe: Arc<dyn DimensionProbe>, max_upload_size: u64) -> Self {
        Self {
            store,
            probe,
            max_upload_size,
        }
    }

    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    /// Validate the part's declared Content-Type against the allow-list.
    /// A missing or generic type is rejected; the filename is never consulted.
    pub fn resolve_type(&self, content_type: Option<&str>) -> Result<ImageMime, UploadError> {
        let declared = content_type.map(str::trim).unwrap_or_default();
        ImageMime::from_mime(declared).ok_or_else(|| {
            let shown = if declared.is_empty() { "none" } else { declared };
            UploadError::UnsupportedType(shown.to_string())
        })
    }

    pub fn check_size(&self, byte_len: u64) -> Result<(), UploadError> {
        if byte_len > self.max_upload_size {
            return Err(UploadError::FileTooLarge {
                limit: self.max_upload_size,
            });
        }
        Ok(())
    }

    /// Run every gate, derive dimensions, and commit the image.
    ///
    /// The record is inserted with its dimensions already attached; nothing
    /// is stored when any step fails.
    pub async fn process(&self, file: Option<IncomingFile>) -> Result<ImageView, UploadError> {
        let file = file.ok_or(UploadError::MissingFile)?;
        let mime_type = self.resolve_type(file.content_type.as_deref())?;
        self.check_size(file.data.len() as u64)?;

        let dimensions = self
            .probe
            .probe(&file.data)
            .await
            .map_err(|e| UploadError::Internal(e.to_string()))?;

        let filename = file
            .filename
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let record = self
            .store
            .add(filename, mime_type, file.data, Some(dimensions));

        tracing::info!(
            id = record.id,
            filename = %record.filename,
            size = %format!("{:.2} MB", record.size as f64 / MIB as f64),
            dimensions = %dimensions,
            total_images = self.store.count(),
            "Image uploaded"
        );

        Ok(record.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FixedProbe;

    fn pipeline(max: u64) -> (ImageStore, UploadPipeline) {
        let store = ImageStore::new();
        let pipeline = UploadPipeline::new(store.clone(), Arc::new(FixedProbe::default()), max);
        (store, pipeline)
    }

    #[test]
    fn test_resolve_declared_type() {
        let (_, p) = pipeline(MIB);
        assert_eq!(p.resolve_type(Some("image/png")).unwrap(), ImageMime::Png);
        assert_eq!(p.resolve_type(Some("image/jpg")).unwrap(), ImageMime::Jpeg);
        assert_eq!(
            p.resolve_type(Some("IMAGE/JPEG; charset=binary")).unwrap(),
            ImageMime::Jpeg
        );
    }

    #[test]
    fn test_disallowed_type_rejected() {
        let (_, p) = pipeline(MIB);
        let err = p.resolve_type(Some("text/plain")).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(ref t) if t == "text/plain"));
        assert!(p.resolve_type(Some("image/gif")).is_err());
    }

    #[test]
    fn test_generic_or_missing_type_rejected() {
        let (_, p) = pipeline(MIB);
        assert!(matches!(
            p.resolve_type(Some("application/octet-stream")),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            p.resolve_type(Some("  ")),
            Err(UploadError::UnsupportedType(ref t)) if t == "none"
        ));
        assert!(p.resolve_type(None).is_err());
    }

    #[tokio::test]
    async fn test_image_extension_does_not_rescue_generic_type() {
        let (store, p) = pipeline(MIB);
        let err = p
            .process(Some(IncomingFile {
                filename: Some("photo.png".into()),
                content_type: Some("application/octet-stream".into()),
                data: Bytes::from_static(b"\x89PNG"),
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let (_, p) = pipeline(3 * MIB);
        assert!(p.check_size(3 * MIB).is_ok());
        assert!(matches!(
            p.check_size(3 * MIB + 1),
            Err(UploadError::FileTooLarge { limit }) if limit == 3 * MIB
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UploadError::MissingFile.to_string(), "No file uploaded");
        assert_eq!(
            UploadError::FileTooLarge { limit: 3 * MIB }.to_string(),
            "File size too large. Maximum 3MB allowed."
        );
        assert_eq!(
            UploadError::FileTooLarge { limit: 1000 }.to_string(),
            "File size too large. Maximum 1000 bytes allowed."
        );
        assert_eq!(
            UploadError::Internal("probe exploded".into()).to_string(),
            "Failed to upload image"
        );
    }

    #[tokio::test]
    async fn test_process_defaults_missing_filename() {
        let (store, p) = pipeline(MIB);
        let view = p
            .process(Some(IncomingFile {
                filename: Some("  ".into()),
                content_type: Some("image/png".into()),
                data: Bytes::from_static(b"\x89PNG"),
            }))
            .await
            .unwrap();
        assert_eq!(view.filename, "upload");
        assert_eq!(store.count(), 1);
    }
}
