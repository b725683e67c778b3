use std::path::{Component, Path, PathBuf};

use crate::error::StoreError;

/// Uploaded files on local disk, served back under a public URL prefix.
#[derive(Clone, Debug)]
pub struct ObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl ObjectStorage {
    pub fn new(root: impl Into<PathBuf>, publicBaseUrl: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: publicBaseUrl.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    /// Stores `bytes` under `key` and returns its public URL.
    pub async fn upload(&self, key: &str, bytes: &[u8], contentType: &str) -> Result<String, StoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::info!("stored {key} ({} bytes, {contentType})", bytes.len());
        Ok(self.url_for(key))
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::not_found("objects", key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the object behind a URL this storage handed out. Unknown URLs are ignored.
    pub async fn delete_url(&self, url: &str) -> Result<(), StoreError> {
        let Some(key) = url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(());
        };
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// File name reduced to characters that are safe in a storage key.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload.dxf".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> ObjectStorage {
        let root = std::env::temp_dir().join(format!("sheet-objects-{}", uuid::Uuid::new_v4()));
        ObjectStorage::new(root, "/files/")
    }

    #[tokio::test]
    async fn upload_then_read_and_delete() {
        let objects = storage();
        let url = objects
            .upload("dxf/u1/1_part.dxf", b"0\nEOF\n", "application/dxf")
            .await
            .unwrap();
        assert_eq!(url, "/files/dxf/u1/1_part.dxf");
        assert_eq!(objects.read("dxf/u1/1_part.dxf").await.unwrap(), b"0\nEOF\n");

        objects.delete_url(&url).await.unwrap();
        assert!(matches!(
            objects.read("dxf/u1/1_part.dxf").await,
            Err(StoreError::NotFound { .. })
        ));
        let _ = tokio::fs::remove_dir_all(objects.root()).await;
    }

    #[tokio::test]
    async fn keys_cannot_escape_root() {
        let objects = storage();
        for key in ["../etc/passwd", "/abs/path", "a/../../b", "", "a\\b"] {
            let err = objects.upload(key, b"x", "text/plain").await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "{key}");
        }
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("my part (v2).dxf"), "my_part__v2_.dxf");
        assert_eq!(sanitize_file_name("../../evil.dxf"), "evil.dxf");
        assert_eq!(sanitize_file_name("C:\\drawings\\plate.dxf"), "plate.dxf");
        assert_eq!(sanitize_file_name(".."), "upload.dxf");
    }
}
