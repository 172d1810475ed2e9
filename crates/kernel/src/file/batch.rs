//! Image batches collected from a bird form before they are stored.

use tracing::debug;
use uuid::Uuid;

/// Maximum upload size per image (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Image types accepted for bird photos.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Images allowed per bird.
pub const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Limit of {limit} Files!")]
    LimitReached { limit: usize },

    #[error("File Must be an Image!")]
    UnsupportedType { mime_type: String },

    #[error("File is too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Limits applied to each batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_images: usize,
    pub allowed_mime_types: Vec<String>,
    pub max_file_size: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}

/// An accepted image not yet written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Ordered set of images bounded by an [`UploadPolicy`].
#[derive(Debug, Clone)]
pub struct ImageBatch {
    policy: UploadPolicy,
    images: Vec<PendingImage>,
}

impl ImageBatch {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            images: Vec::new(),
        }
    }

    /// Accept an image, returning its id.
    ///
    /// The declared type must be allowed, and when the content has a
    /// recognisable signature it must match the declared type.
    pub fn add(
        &mut self,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<Uuid, UploadError> {
        if self.images.len() >= self.policy.max_images {
            return Err(UploadError::LimitReached {
                limit: self.policy.max_images,
            });
        }

        let declared = mime_type.trim().to_ascii_lowercase();
        if !self.policy.allows(&declared) {
            return Err(UploadError::UnsupportedType {
                mime_type: declared,
            });
        }

        if let Some(kind) = infer::get(&data) {
            if kind.mime_type() != declared {
                return Err(UploadError::UnsupportedType {
                    mime_type: kind.mime_type().to_string(),
                });
            }
        }

        if data.len() > self.policy.max_file_size {
            return Err(UploadError::TooLarge {
                size: data.len(),
                max: self.policy.max_file_size,
            });
        }

        let id = Uuid::now_v7();
        debug!(%id, filename = %filename, mime_type = %declared, size = data.len(), "image queued");
        self.images.push(PendingImage {
            id,
            filename: filename.to_string(),
            mime_type: declared,
            data,
        });
        Ok(id)
    }

    /// Drop one image; `false` when the id is unknown.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.images.len();
        self.images.retain(|i| i.id != id);
        self.images.len() != before
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<PendingImage> {
        self.images
    }
}
