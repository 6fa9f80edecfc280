//! Temporary staging of upload bytes
//!
//! Incoming file fields are streamed into a [`StagingBuffer`] and frozen into a
//! [`StagedFile`] once the field ends. The pipeline releases every staged file
//! exactly once, whatever the outcome of its upload.

use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use gallery_core::{AppError, StagingBackend};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

/// Where staged bytes live
#[derive(Debug, Clone)]
pub struct StagingArea {
    backend: StagingBackend,
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(backend: StagingBackend, dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            dir: dir.into(),
        }
    }

    pub fn memory() -> Self {
        Self::new(StagingBackend::Memory, PathBuf::new())
    }

    pub fn backend(&self) -> StagingBackend {
        self.backend
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the staging directory for the disk backend.
    pub async fn prepare(&self) -> Result<(), AppError> {
        if self.backend == StagingBackend::Disk {
            tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create staging directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Open a buffer for one file.
    pub async fn begin(&self) -> Result<StagingBuffer, AppError> {
        match self.backend {
            StagingBackend::Memory => Ok(StagingBuffer::Memory(BytesMut::new())),
            StagingBackend::Disk => {
                let named = tempfile::Builder::new()
                    .prefix("upload-")
                    .tempfile_in(&self.dir)
                    .map_err(|e| {
                        AppError::Internal(format!("Failed to create staging file: {}", e))
                    })?;
                let (file, path) = named.into_parts();
                Ok(StagingBuffer::Disk {
                    file: tokio::fs::File::from_std(file),
                    path,
                })
            }
        }
    }
}

/// Open buffer receiving the chunks of one multipart field
pub enum StagingBuffer {
    Memory(BytesMut),
    Disk {
        file: tokio::fs::File,
        path: TempPath,
    },
}

impl StagingBuffer {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        match self {
            StagingBuffer::Memory(buf) => {
                buf.extend_from_slice(chunk);
                Ok(())
            }
            StagingBuffer::Disk { file, .. } => file
                .write_all(chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write staging file: {}", e))),
        }
    }

    /// Freeze the buffer; `size` is the full field size as received.
    pub async fn finish(
        self,
        name: String,
        content_type: String,
        size: u64,
    ) -> Result<StagedFile, AppError> {
        let data = match self {
            StagingBuffer::Memory(buf) => StagedData::Memory(buf.freeze()),
            StagingBuffer::Disk { mut file, path } => {
                file.flush()
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to flush staging file: {}", e)))?;
                StagedData::Disk(path)
            }
        };
        Ok(StagedFile {
            name,
            content_type,
            size,
            data,
        })
    }
}

#[derive(Debug)]
pub enum StagedData {
    Memory(Bytes),
    Disk(TempPath),
}

/// One received file, held until its upload finishes
#[derive(Debug)]
pub struct StagedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    data: StagedData,
}

impl StagedFile {
    #[cfg(test)]
    pub fn in_memory(name: &str, content_type: &str, data: &'static [u8]) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
            data: StagedData::Memory(Bytes::from_static(data)),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        match &self.data {
            StagedData::Memory(_) => None,
            StagedData::Disk(path) => Some(path),
        }
    }

    pub async fn read(&self) -> Result<Bytes, AppError> {
        match &self.data {
            StagedData::Memory(bytes) => Ok(bytes.clone()),
            StagedData::Disk(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| AppError::Internal(format!("Failed to read staged file: {}", e))),
        }
    }

    /// Drop the staged bytes. Failures are logged, never returned.
    pub async fn release(self) {
        if let StagedData::Disk(path) = self.data {
            let shown = path.display().to_string();
            let result = tokio::task::spawn_blocking(move || path.close()).await;
            match result {
                Ok(Ok(())) => tracing::trace!(path = %shown, "Released staged file"),
                Ok(Err(e)) => {
                    tracing::warn!(path = %shown, error = %e, "Failed to remove staged file")
                }
                Err(e) => {
                    tracing::warn!(path = %shown, error = %e, "Staged file cleanup task failed")
                }
            }
        }
    }
}

/// Release a whole batch.
pub async fn release_all(files: Vec<StagedFile>) {
    for file in files {
        file.release().await;
    }
}
