use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;

const RESUME_FILE_NAME: &str = "resume.pdf";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    pub file_name: String,
    pub size: u64,
    pub updated_at: DateTime<Utc>,
}

/// Single resume PDF kept on local disk.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    dir: PathBuf,
}

impl ResumeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResumeStore { dir: dir.into() }
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(RESUME_FILE_NAME)
    }

    pub fn file_name(&self) -> &'static str {
        RESUME_FILE_NAME
    }

    /// Writes to a sibling temp file and renames it over the old resume so
    /// readers never see a partial file.
    pub async fn replace(&self, bytes: &[u8]) -> Result<ResumeInfo, AppError> {
        fs::create_dir_all(&self.dir).await?;

        let tmp = self.dir.join(format!(".{}.{}.tmp", RESUME_FILE_NAME, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, self.file_path()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::info!(size = bytes.len(), "Resume replaced");
        self.info().await?.ok_or_else(|| AppError::InternalError("Resume vanished after write".into()))
    }

    pub async fn info(&self) -> Result<Option<ResumeInfo>, AppError> {
        match fs::metadata(self.file_path()).await {
            Ok(meta) => Ok(Some(ResumeInfo {
                file_name: RESUME_FILE_NAME.to_string(),
                size: meta.len(),
                updated_at: meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read(&self) -> Result<Option<Vec<u8>>, AppError> {
        read_if_exists(&self.file_path()).await
    }

    /// `false` when there was nothing to delete.
    pub async fn delete(&self) -> Result<bool, AppError> {
        match fs::remove_file(self.file_path()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
