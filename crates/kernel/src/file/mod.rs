//! Bird photo uploads.
//!
//! Images are validated into an [`ImageBatch`] and then written through a
//! [`FileStorage`] backend.

pub mod batch;
pub mod storage;

pub use batch::{
    ALLOWED_MIME_TYPES, ImageBatch, MAX_FILE_SIZE, MAX_IMAGES, PendingImage, UploadError,
    UploadPolicy,
};
pub use storage::{FileStorage, LocalFileStorage};

use anyhow::Result;

/// Write every image in `batch`, returning their URIs in order.
///
/// On failure the files already written are removed again.
pub async fn store_batch(storage: &dyn FileStorage, batch: ImageBatch) -> Result<Vec<String>> {
    let mut uris = Vec::with_capacity(batch.len());
    for image in batch.into_images() {
        match storage.store(&image.filename, &image.data).await {
            Ok(uri) => {
                tracing::debug!(
                    uri = %uri,
                    url = %storage.public_url(&uri),
                    size = image.data.len(),
                    "image stored"
                );
                uris.push(uri);
            }
            Err(e) => {
                delete_all(storage, &uris).await;
                return Err(e);
            }
        }
    }
    Ok(uris)
}

/// Best-effort removal of stored files.
pub async fn delete_all(storage: &dyn FileStorage, uris: &[String]) {
    for uri in uris {
        if let Err(e) = storage.delete(uri).await {
            tracing::warn!(uri = %uri, error = %e, "failed to delete stored image");
        }
    }
}
