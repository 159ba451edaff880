//! Filesystem payload store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nxshelf_core::{PayloadStorePort, TransferError, TransferItem, TransferResult};
use url::Url;

/// Moves finished payloads into a downloads directory.
#[derive(Debug, Clone)]
pub struct FsPayloadStore {
    downloads_dir: PathBuf,
}

impl FsPayloadStore {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Destination for `item`: the URL's last path segment, or the source id.
    pub fn destination(&self, item: &TransferItem) -> PathBuf {
        let name = file_name_from_url(&item.source_url)
            .unwrap_or_else(|| item.source_id.to_string());
        self.downloads_dir.join(name)
    }
}

fn file_name_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let segment = url.path_segments()?.next_back()?;
    // Reject anything that could escape the downloads directory.
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return None;
    }
    Some(segment.to_string())
}

#[async_trait]
impl PayloadStorePort for FsPayloadStore {
    async fn persist(&self, item: &TransferItem, temp_path: &Path) -> TransferResult<PathBuf> {
        let target = self.destination(item);

        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|e| {
                TransferError::storage(format!(
                    "Cannot create {}: {e}",
                    self.downloads_dir.display()
                ))
            })?;

        if tokio::fs::rename(temp_path, &target).await.is_err() {
            // Likely a cross-device move.
            tokio::fs::copy(temp_path, &target).await.map_err(|e| {
                TransferError::storage(format!(
                    "Cannot move {} to {}: {e}",
                    temp_path.display(),
                    target.display()
                ))
            })?;
            if let Err(e) = tokio::fs::remove_file(temp_path).await {
                tracing::warn!(
                    target: "nxshelf.transfer",
                    path = %temp_path.display(),
                    error = %e,
                    "Could not remove temp file after copy"
                );
            }
        }

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxshelf_core::TitleId;

    fn item(url: &str) -> TransferItem {
        TransferItem::new(TitleId::parse("01001E500F7FC000").unwrap(), url)
    }

    #[test]
    fn test_destination_uses_last_url_segment() {
        let store = FsPayloadStore::new("/downloads");
        assert_eq!(
            store.destination(&item("https://cdn.example/files/game%20v2.nsp?sig=1")),
            PathBuf::from("/downloads/game%20v2.nsp")
        );
    }

    #[test]
    fn test_destination_falls_back_to_source_id() {
        let store = FsPayloadStore::new("/downloads");
        for url in ["https://cdn.example/", "not a url", "https://cdn.example/a/.."] {
            assert_eq!(
                store.destination(&item(url)),
                PathBuf::from("/downloads/01001E500F7FC000"),
                "{url}"
            );
        }
    }

    #[tokio::test]
    async fn test_persist_moves_file() {
        let temp = tempfile::tempdir().unwrap();
        let partial = temp.path().join("h1.part");
        tokio::fs::write(&partial, b"payload").await.unwrap();

        let store = FsPayloadStore::new(temp.path().join("downloads"));
        let stored = tokio_test::assert_ok!(
            store
                .persist(&item("https://cdn.example/title.nsp"), &partial)
                .await
        );

        assert_eq!(stored, temp.path().join("downloads").join("title.nsp"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"payload");
        assert!(!partial.exists());
    }

    #[tokio::test]
    async fn test_persist_missing_temp_file_is_storage_error() {
        let temp = tempfile::tempdir().unwrap();
        let store = FsPayloadStore::new(temp.path());

        let err = tokio_test::assert_err!(
            store
                .persist(&item("https://cdn.example/title.nsp"), &temp.path().join("gone.part"))
                .await
        );
        assert!(matches!(err, TransferError::Storage { .. }));
    }
}
