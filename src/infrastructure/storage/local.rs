use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Attempts at finding a free `<millis><name>` slot before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Documents stored as flat files under a single directory.
///
/// Filenames are `<unix-millis><sanitized original name>`; the directory is
/// also what the HTTP layer serves statically.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Write `data` under a fresh timestamp-prefixed name and return that name.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> std::io::Result<String> {
        let base = sanitize_file_name(original_name.unwrap_or_default());
        let millis = Utc::now().timestamp_millis();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let filename = format!("{}{}", millis + offset, base);
            let path = self.root.join(&filename);
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            if let Err(e) = write_all(&mut file, data).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e);
            }

            debug!(filename = %filename, size_bytes = data.len(), "Document stored");
            return Ok(filename);
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free filename for {}", base),
        ))
    }

    /// Remove a stored document. Missing files are not an error.
    pub async fn remove(&self, filename: &str) -> std::io::Result<()> {
        let name = sanitize_file_name(filename);
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Best-effort removal; failures are logged and swallowed.
    pub async fn discard(&self, filenames: &[String]) {
        for filename in filenames {
            if let Err(e) = self.remove(filename).await {
                warn!(filename = %filename, "Failed to remove document: {}", e);
            }
        }
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Keeps the last component only and maps anything outside `[A-Za-z0-9._-]`
/// to `_`. Names that end up empty or made only of dots become `upload`.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalDocumentStore {
        let dir = std::env::temp_dir().join(format!("livecolab-docs-{}", uuid::Uuid::new_v4()));
        LocalDocumentStore::new(dir)
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\scan 1.pdf"), "scan_1.pdf");
        assert_eq!(sanitize_file_name("visa.png"), "visa.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("dir/"), "upload");
    }

    #[tokio::test]
    async fn save_writes_timestamp_prefixed_file() {
        let store = temp_store();
        store.ensure_root().await.unwrap();

        let name = store.save(Some("passport.pdf"), b"%PDF-1.7").await.unwrap();
        assert!(name.ends_with("passport.pdf"));
        assert!(name.trim_end_matches("passport.pdf").chars().all(|c| c.is_ascii_digit()));

        let stored = fs::read(store.root.join(&name)).await.unwrap();
        assert_eq!(stored, b"%PDF-1.7");

        let _ = fs::remove_dir_all(&store.root).await;
    }

    #[tokio::test]
    async fn same_name_in_same_millisecond_does_not_collide() {
        let store = temp_store();
        store.ensure_root().await.unwrap();

        let first = store.save(Some("scan.jpg"), b"one").await.unwrap();
        let second = store.save(Some("scan.jpg"), b"two").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read(store.root.join(&first)).await.unwrap(), b"one");
        assert_eq!(fs::read(store.root.join(&second)).await.unwrap(), b"two");

        let _ = fs::remove_dir_all(&store.root).await;
    }

    #[tokio::test]
    async fn remove_ignores_missing_files() {
        let store = temp_store();
        store.ensure_root().await.unwrap();

        let name = store.save(Some("visa.pdf"), b"v").await.unwrap();
        store.remove(&name).await.unwrap();
        assert!(!store.root.join(&name).exists());
        store.remove(&name).await.unwrap();

        let _ = fs::remove_dir_all(&store.root).await;
    }
}
