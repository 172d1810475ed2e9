//! Image storage backends.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Scheme prefix for locally stored files.
const LOCAL_SCHEME: &str = "local://";

/// Storage backend for uploaded images.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `data` under a fresh URI derived from `filename`.
    async fn store(&self, filename: &str, data: &[u8]) -> Result<String>;

    /// Delete a stored file. Missing files are not an error.
    async fn delete(&self, uri: &str) -> Result<()>;

    async fn exists(&self, uri: &str) -> Result<bool>;

    /// Public URL for a stored file.
    fn public_url(&self, uri: &str) -> String;
}

/// Public path for a storage URI under `base_url`.
///
/// Values without the local scheme pass through so hand-entered URLs keep
/// working.
pub fn public_path(base_url: &str, uri: &str) -> String {
    match uri.strip_prefix(LOCAL_SCHEME) {
        Some(path) => format!("{}/{}", base_url.trim_end_matches('/'), path),
        None => uri.to_string(),
    }
}

/// Reduce a client-supplied filename to a safe final path component.
pub fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let safe: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .take(200)
        .collect();

    if safe.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        safe
    }
}

/// Local filesystem storage.
pub struct LocalFileStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a `local://` URI to a path under the base directory.
    ///
    /// Rejects `..` components.
    fn parse_uri(&self, uri: &str) -> Result<PathBuf> {
        let path = uri
            .strip_prefix(LOCAL_SCHEME)
            .context("invalid local URI, must start with local://")?;
        for component in Path::new(path).components() {
            if !matches!(component, Component::Normal(_)) {
                anyhow::bail!("storage URI must be a relative path without '..'");
            }
        }
        Ok(self.base_path.join(path))
    }

    /// `local://YYYY/MM/<id8>_<name>` for a new file.
    pub fn generate_uri(&self, filename: &str) -> String {
        let now = chrono::Utc::now();
        let unique_id = uuid::Uuid::now_v7().simple().to_string();

        format!(
            "{LOCAL_SCHEME}{}/{}/{}_{}",
            now.format("%Y"),
            now.format("%m"),
            &unique_id[..8],
            sanitize_filename(filename)
        )
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, filename: &str, data: &[u8]) -> Result<String> {
        let uri = self.generate_uri(filename);
        let path = self.parse_uri(&uri)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("failed to create directories")?;
        }

        let mut file = fs::File::create(&path)
            .await
            .context("failed to create file")?;
        file.write_all(data).await.context("failed to write file")?;
        file.flush().await.context("failed to flush file")?;

        debug!(uri = %uri, path = ?path, size = data.len(), "file written");
        Ok(uri)
    }

    async fn delete(&self, uri: &str) -> Result<()> {
        let path = self.parse_uri(uri)?;

        match fs::remove_file(&path).await {
            Ok(()) => debug!(uri = %uri, "file deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(uri = %uri, "file not found for deletion");
            }
            Err(e) => return Err(e).context("failed to delete file"),
        }

        Ok(())
    }

    async fn exists(&self, uri: &str) -> Result<bool> {
        let path = self.parse_uri(uri)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, uri: &str) -> String {
        public_path(&self.base_url, uri)
    }
}

impl std::fmt::Debug for LocalFileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFileStorage")
            .field("base_path", &self.base_path)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalFileStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("copsewood-store-{}", uuid::Uuid::now_v7()));
        (LocalFileStorage::new(&dir, "/uploads"), dir)
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my bird (1).png"), "my_bird__1_.png");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn generated_uri_has_date_and_short_id() {
        let (storage, _) = temp_storage();
        let uri = storage.generate_uri("Kiwi Photo.JPG");
        let rest = uri.strip_prefix("local://").unwrap();
        let parts: Vec<&str> = rest.split('/').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 4);
        assert_eq!(parts[1].len(), 2);
        assert!(parts[2].ends_with("_Kiwi_Photo.JPG"));
        assert_eq!(parts[2].find('_'), Some(8));
    }

    #[test]
    fn traversal_uris_are_rejected() {
        let (storage, _) = temp_storage();
        assert!(storage.parse_uri("local://../secret").is_err());
        assert!(storage.parse_uri("local:///etc/passwd").is_err());
        assert!(storage.parse_uri("http://example.com/x").is_err());
    }

    #[test]
    fn public_path_maps_only_local_uris() {
        assert_eq!(public_path("/uploads/", "local://2025/01/a_b.png"), "/uploads/2025/01/a_b.png");
        assert_eq!(public_path("/uploads", "https://cdn/x.png"), "https://cdn/x.png");
    }

    #[tokio::test]
    async fn store_then_delete() {
        let (storage, dir) = temp_storage();
        let uri = storage.store("bird.png", b"pixels").await.unwrap();

        assert!(storage.exists(&uri).await.unwrap());
        let path = storage.parse_uri(&uri).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"pixels");

        storage.delete(&uri).await.unwrap();
        assert!(!storage.exists(&uri).await.unwrap());
        // second delete is a no-op
        storage.delete(&uri).await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }
}
