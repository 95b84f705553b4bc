//! Sequential asset downloader
//!
//! Streams each download link to `destination/link.name`, one link at a time.
//! Every link ends in exactly one of two terminal states and failures never
//! stop the run, so the returned [`DownloadOutcome`] always partitions the
//! input.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::domain::product::{DownloadLink, DownloadOutcome};
use crate::infrastructure::endpoints::{EndpointError, Endpoints};
use crate::infrastructure::http_client::{ByteStream, DocumentFetcher, TransportError};

/// Per-link failure; absorbed into the outcome, never returned to callers
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Lifecycle of a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Pending,
    Streaming,
    Completed,
    Failed,
}

pub struct AssetDownloader {
    fetcher: Arc<dyn DocumentFetcher>,
    endpoints: Endpoints,
}

impl AssetDownloader {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Download every link into `destination`, strictly one after another
    pub async fn download(&self, links: &[DownloadLink], destination: &Path) -> DownloadOutcome {
        info!(
            "Downloading {} files into {}",
            links.len(),
            destination.display()
        );

        let outcome = stream::iter(links)
            .fold(DownloadOutcome::default(), move |mut outcome, link| async move {
                match self.download_link(link, destination).await {
                    LinkState::Completed => outcome.successful_downloads += 1,
                    _ => outcome.failed_downloads += 1,
                }
                outcome
            })
            .await;

        info!(
            "Download finished: {} succeeded, {} failed",
            outcome.successful_downloads, outcome.failed_downloads
        );
        outcome
    }

    /// Run one link to a terminal state
    async fn download_link(&self, link: &DownloadLink, destination: &Path) -> LinkState {
        let mut state = LinkState::Pending;

        let terminal = match self.fetch_and_persist(link, destination, &mut state).await {
            Ok(bytes) => {
                debug!("Saved {} ({} bytes)", link.name, bytes);
                LinkState::Completed
            }
            Err(e) => {
                warn!("Failed to download {} from {}: {}", link.name, link.url, e);
                LinkState::Failed
            }
        };

        debug!("{}: {:?} -> {:?}", link.name, state, terminal);
        terminal
    }

    async fn fetch_and_persist(
        &self,
        link: &DownloadLink,
        destination: &Path,
        state: &mut LinkState,
    ) -> Result<u64, DownloadError> {
        let request = self.endpoints.raw(&link.url)?;
        let stream = self.fetcher.stream(&request).await?;
        *state = LinkState::Streaming;

        ensure_directory(destination).await?;

        persist_stream(stream, &destination.join(&link.name)).await
    }
}

/// Create the directory (with parents) unless it already exists
async fn ensure_directory(path: &Path) -> Result<(), DownloadError> {
    let exists = fs::try_exists(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    if !exists {
        fs::create_dir_all(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        debug!("Created directory {}", path.display());
    }

    Ok(())
}

/// Write the stream to `path`; a partial file is removed on failure
async fn persist_stream(mut stream: ByteStream, path: &Path) -> Result<u64, DownloadError> {
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let result = write_stream(&mut stream, file, path).await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(path).await {
            debug!("Could not remove partial file {}: {}", path.display(), e);
        }
    }

    result
}

/// Takes ownership of the file so the handle is closed before any cleanup
async fn write_stream(stream: &mut ByteStream, file: File, path: &Path) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
