use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use kernel::repository::upload::{UploadKind, UploadStore};
use shared::error::{AppError, AppResult};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Keeps uploads as plain files in one directory.
pub struct LocalUploadStore {
    dir: PathBuf,
}

impl LocalUploadStore {
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(AppError::UploadError)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, kind: UploadKind, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        let millis = Utc::now().timestamp_millis();
        let mut attempt = 0;
        loop {
            let name = stored_name(kind, original_name, millis, attempt);
            // create_new keeps an upload from replacing one stored in the same millisecond
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&name))
                .await;
            match opened {
                Ok(mut file) => {
                    file.write_all(bytes).await.map_err(AppError::UploadError)?;
                    file.flush().await.map_err(AppError::UploadError)?;
                    tracing::debug!(file = %name, size = bytes.len(), "upload stored");
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(AppError::UploadError(e)),
            }
        }
    }
}

fn stored_name(kind: UploadKind, original_name: &str, millis: i64, attempt: u32) -> String {
    // only the last path component of a client-supplied name is kept
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("archivo");
    let stamp = match attempt {
        0 => millis.to_string(),
        n => format!("{millis}_{n}"),
    };
    match kind {
        UploadKind::Photo => format!("{stamp}-{base}"),
        UploadKind::Screenshot => match Path::new(base).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("reporte_{stamp}.{ext}"),
            None => format!("reporte_{stamp}"),
        },
    }
}
