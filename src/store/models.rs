use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Image formats accepted at ingress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl ImageMime {
    /// Parse an allowed MIME type. `image/jpg` is accepted as an alias of `image/jpeg`.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An image held by the store. `data` is never mutated after creation.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: u64,
    pub filename: String,
    pub mime_type: ImageMime,
    pub data: Bytes,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub dimensions: Option<Dimensions>,
}

impl ImageRecord {
    /// Project the record without its raw bytes.
    pub fn view(&self) -> ImageView {
        ImageView {
            id: self.id,
            filename: self.filename.clone(),
            mime_type: self.mime_type,
            size: self.size,
            uploaded_at: self.uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            dimensions: self.dimensions,
        }
    }
}

/// Public metadata view of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: u64,
    pub filename: String,
    pub mime_type: ImageMime,
    pub size: u64,
    pub uploaded_at: String,
    pub dimensions: Option<Dimensions>,
}

/// Aggregates computed from the store's current contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_images: usize,
    pub total_size: u64,
    pub average_size: f64,
}
