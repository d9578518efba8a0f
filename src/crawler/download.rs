//! Download cache for resource documents
//!
//! Every resource document is fetched at most once per destination path.
//! A file already present at the destination is trusted as-is: it is never
//! re-fetched or re-validated, which makes repeated runs cheap and safe.
//!
//! Bodies are streamed into a temporary file next to the destination and
//! renamed into place only after the last chunk has been written and
//! synced, so an interrupted download never leaves a file that looks
//! complete.

use crate::client::{ensure_success, PortalClient};
use crate::ChefError;
use reqwest::header::HeaderMap;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Result of [`DownloadCache::ensure_downloaded`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The destination already existed; nothing was requested
    Cached,

    /// The document was fetched and committed to the destination
    Fetched {
        /// Number of bytes written
        bytes: u64,
        /// Hex-encoded SHA-256 of the content
        sha256: String,
    },
}

/// Directory of downloaded documents
#[derive(Debug, Clone)]
pub struct DownloadCache {
    directory: PathBuf,
}

impl DownloadCache {
    /// Opens the cache at `directory`, creating it if absent
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, ChefError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Destination of the document titled `title`: `{directory}/{title}.pdf`
    ///
    /// Titles are used verbatim except for path separators and NUL, which
    /// are replaced by `-` so a title can never escape the directory.
    pub fn path_for(&self, title: &str) -> PathBuf {
        let stem: String = title
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '-',
                other => other,
            })
            .collect();
        self.directory.join(format!("{}.pdf", stem))
    }

    /// Makes sure `url` is stored at `destination`
    ///
    /// # Returns
    ///
    /// * `Ok(DownloadOutcome::Cached)` - The file existed; no request was made
    /// * `Ok(DownloadOutcome::Fetched { .. })` - The file was downloaded
    /// * `Err(ChefError)` - The download failed and nothing was committed
    pub async fn ensure_downloaded(
        &self,
        client: &PortalClient,
        url: &str,
        destination: &Path,
    ) -> Result<DownloadOutcome, ChefError> {
        if destination.exists() {
            tracing::debug!("Using cached {}", destination.display());
            return Ok(DownloadOutcome::Cached);
        }

        let staging_dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(staging_dir)?;

        // Removed on drop unless persisted below
        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(staging_dir)?;
        let mut writer = tokio::fs::File::from_std(staging.as_file().try_clone()?);

        tracing::debug!("Downloading {} to {}", url, destination.display());
        let mut response = ensure_success(client.get(url, HeaderMap::new()).await?)?;

        let mut hasher = Sha256::new();
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|source| ChefError::Http {
            url: url.to_string(),
            source,
        })? {
            hasher.update(&chunk);
            bytes += chunk.len() as u64;
            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;
        writer.sync_all().await?;
        drop(writer);

        staging
            .persist(destination)
            .map_err(|e| ChefError::Download {
                url: url.to_string(),
                path: destination.display().to_string(),
                message: e.error.to_string(),
            })?;

        let sha256 = hex::encode(hasher.finalize());
        tracing::debug!("Stored {} bytes at {}", bytes, destination.display());

        Ok(DownloadOutcome::Fetched { bytes, sha256 })
    }
}
