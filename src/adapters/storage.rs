use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);
        let display = full_path.display().to_string();
        let data = data.to_vec();

        let written = tokio::task::spawn_blocking(move || replace_file(&full_path, &data))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
            .and_then(|result| result);

        written.map_err(|source| EtlError::OutputError {
            path: display.clone(),
            source,
        })?;
        Ok(display)
    }
}

// 先寫入同目錄的暫存檔再改名，失敗時舊檔保持完整
fn replace_file(full_path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match full_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(full_path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested/out");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        let written = storage.write_file("licitaciones.csv", b"a,b\r\n").await.unwrap();

        assert!(written.ends_with("licitaciones.csv"));
        assert_eq!(std::fs::read(base.join("licitaciones.csv")).unwrap(), b"a,b\r\n");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_content_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("licitaciones.csv", b"old,content\r\n").await.unwrap();
        storage.write_file("licitaciones.csv", b"new\r\n").await.unwrap();

        assert_eq!(
            std::fs::read(temp_dir.path().join("licitaciones.csv")).unwrap(),
            b"new\r\n"
        );
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_failed_replace_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        storage.write_file("licitaciones.csv", b"good\r\n").await.unwrap();

        // 目標是已存在且非空的目錄，改名必定失敗
        let occupied = temp_dir.path().join("occupied");
        std::fs::create_dir(&occupied).unwrap();
        std::fs::write(occupied.join("keep"), b"x").unwrap();
        let err = storage.write_file("occupied", b"partial").await.unwrap_err();

        assert!(matches!(err, EtlError::OutputError { .. }));
        assert_eq!(
            std::fs::read(temp_dir.path().join("licitaciones.csv")).unwrap(),
            b"good\r\n"
        );
        assert_eq!(std::fs::read(occupied.join("keep")).unwrap(), b"x");
        // 暫存檔已被清除
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[tokio::test]
    async fn test_write_failure_is_output_error() {
        let temp_dir = TempDir::new().unwrap();
        // 以一般檔案佔住目錄位置，使建立目錄失敗
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let storage = LocalStorage::new(blocker.join("out").to_str().unwrap().to_string());

        let err = storage.write_file("licitaciones.csv", b"").await.unwrap_err();

        assert!(matches!(err, EtlError::OutputError { .. }));
    }
}
