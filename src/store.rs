use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;

use crate::error::StoreError;

/// Directory of uploaded files. Every upload is kept; readers always pick the
/// most recently modified one.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the upload as `<unix seconds>_<file name>` and returns its path.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self
            .dir
            .join(format!("{}_{}", Utc::now().timestamp(), sanitize_file_name(file_name)));
        tokio::fs::write(&path, bytes).await?;

        Ok(path)
    }

    /// Newest regular file by modification time, ties broken by name.
    pub async fn latest(&self) -> Result<PathBuf, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NoUploads),
            Err(e) => return Err(e.into()),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let candidate = (metadata.modified()?, entry.path());
            if newest.as_ref().map_or(true, |current| candidate > *current) {
                newest = Some(candidate);
            }
        }

        newest.map(|(_, path)| path).ok_or(StoreError::NoUploads)
    }

    pub async fn read_latest(&self) -> Result<(PathBuf, Vec<u8>), StoreError> {
        let path = self.latest().await?;
        let bytes = tokio::fs::read(&path).await?;
        Ok((path, bytes))
    }
}

/// Keeps only the final path component and replaces anything outside
/// `[A-Za-z0-9._-]`.
fn sanitize_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

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

    if cleaned.trim_matches('.').is_empty() {
        "upload.csv".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my runs (1).csv"), "my_runs__1_.csv");
        assert_eq!(sanitize_file_name(""), "upload.csv");
        assert_eq!(sanitize_file_name(".."), "upload.csv");
    }

    #[tokio::test]
    async fn missing_directory_means_no_uploads() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(tmp.path().join("absent"));
        assert!(matches!(store.latest().await, Err(StoreError::NoUploads)));
    }

    #[tokio::test]
    async fn save_then_read_latest() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(tmp.path().join("uploads"));

        let path = store.save("runs.csv", b"1,2,3\n").await.expect("save");
        let name = path.file_name().and_then(|n| n.to_str()).expect("name");
        assert!(name.ends_with("_runs.csv"));

        let (latest, bytes) = store.read_latest().await.expect("latest");
        assert_eq!(latest, path);
        assert_eq!(bytes, b"1,2,3\n");
    }

    #[tokio::test]
    async fn latest_prefers_newer_modification_time() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let older = tmp.path().join("b_older.csv");
        let newer = tmp.path().join("a_newer.csv");
        std::fs::write(&older, b"old").expect("write");
        std::fs::write(&newer, b"new").expect("write");

        let past = SystemTime::now() - std::time::Duration::from_secs(3600);
        std::fs::File::options()
            .write(true)
            .open(&older)
            .and_then(|f| f.set_modified(past))
            .expect("set mtime");

        let store = UploadStore::new(tmp.path());
        assert_eq!(store.latest().await.expect("latest"), newer);
    }

    #[tokio::test]
    async fn directories_are_ignored() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(tmp.path().join("nested")).expect("mkdir");
        let store = UploadStore::new(tmp.path());
        assert!(matches!(store.latest().await, Err(StoreError::NoUploads)));
    }
}
