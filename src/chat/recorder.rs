use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    task::JoinHandle,
};
use tracing::{error, info};

use super::broadcaster::{Broadcaster, Sink};
use crate::error::{AppErr, AppResult};

/// Appends every broadcast message to a transcript file, synced line by line.
pub struct FileRecorder {
    path: PathBuf,
    file: File,
    sink: Sink,
}

impl FileRecorder {
    /// Opens (or creates) `path` for append and registers an unbounded sink on `br`.
    pub async fn open(path: impl AsRef<Path>, br: &Broadcaster) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| AppErr::Transcript { path: path.clone(), source })?;
        info!(path = %path.display(), "transcript opened");
        Ok(Self { path, file, sink: br.new_unbounded_sink() })
    }

    pub fn spawn(self) -> JoinHandle<AppResult<()>> {
        tokio::spawn(self.run())
    }

    /// Returns once the sink closes, or on the first write/sync failure.
    pub async fn run(mut self) -> AppResult<()> {
        while let Some(msg) = self.sink.recv().await {
            let line = format!("{msg}\n");
            if let Err(source) = write_synced(&mut self.file, line.as_bytes()).await {
                error!(path = %self.path.display(), %source, "transcript write failed");
                return Err(AppErr::Transcript { path: self.path, source });
            }
        }
        Ok(())
    }
}

async fn write_synced(file: &mut File, buf: &[u8]) -> std::io::Result<()> {
    file.write_all(buf).await?;
    file.flush().await?;
    file.sync_data().await
}
