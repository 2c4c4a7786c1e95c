use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;

use super::models::{Dimensions, ImageMime, ImageRecord, ImageView, StoreStats};

struct Inner {
    images: Vec<ImageRecord>,
    next_id: u64,
}

/// In-memory record store. Cloning yields another handle to the same records.
///
/// All mutations take the write lock, so a record is only ever observed with
/// every field populated.
pub struct ImageStore {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for ImageStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageStore {
    /// Create an empty store whose first id is 1.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                images: Vec::new(),
                next_id: 1,
            })),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new record, assigning the next id and the current time.
    ///
    /// Derived dimensions are attached in the same critical section, so
    /// readers never see the record without them.
    pub fn add(
        &self,
        filename: impl Into<String>,
        mime_type: ImageMime,
        data: Bytes,
        dimensions: Option<Dimensions>,
    ) -> ImageRecord {
        let mut inner = self.inner.write();

        let id = inner.next_id;
        inner.next_id += 1;

        let record = ImageRecord {
            id,
            filename: filename.into(),
            mime_type,
            size: data.len() as u64,
            data,
            uploaded_at: Utc::now(),
            dimensions,
        };
        inner.images.push(record.clone());
        record
    }

    /// Remove a record by id, returning it if it existed
    pub fn delete(&self, id: u64) -> Option<ImageRecord> {
        let mut inner = self.inner.write();
        let index = inner.images.iter().position(|img| img.id == id)?;
        Some(inner.images.remove(index))
    }

    /// Remove every record. The id counter keeps its value.
    pub fn purge(&self) -> usize {
        let mut inner = self.inner.write();
        let removed = inner.images.len();
        inner.images.clear();
        removed
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get(&self, id: u64) -> Option<ImageRecord> {
        self.inner
            .read()
            .images
            .iter()
            .find(|img| img.id == id)
            .cloned()
    }

    /// Public views of all records in insertion order
    pub fn get_all(&self) -> Vec<ImageView> {
        self.inner.read().images.iter().map(ImageRecord::view).collect()
    }

    pub fn count(&self) -> usize {
        self.inner.read().images.len()
    }

    /// Total bytes held across all records
    pub fn stored_bytes(&self) -> u64 {
        self.inner.read().images.iter().map(|img| img.size).sum()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let total_images = inner.images.len();
        let total_size: u64 = inner.images.iter().map(|img| img.size).sum();
        let average_size = if total_images > 0 {
            total_size as f64 / total_images as f64
        } else {
            0.0
        };

        StoreStats {
            total_images,
            total_size,
            average_size,
        }
    }
}
