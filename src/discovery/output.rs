//! Newline-delimited output artifact of qualifying entry ids.
//!
//! The file is opened in append+create mode before the run starts, so an
//! unwritable path fails fast. Repeated runs append; deduplication across runs
//! is left to the consumer.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument};

use super::error::DiscoveryError;

/// Default output file name.
pub const DEFAULT_IDS_FILE: &str = "ids.txt";

/// Append-only handle to the ids file.
#[derive(Debug)]
pub struct IdsFile {
    path: PathBuf,
    file: File,
}

impl IdsFile {
    /// Opens (creating if needed) the ids file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Output`] if the file cannot be opened.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn open(path: &Path) -> Result<Self, DiscoveryError> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o600);

        let file = options
            .open(path)
            .await
            .map_err(|e| DiscoveryError::output(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line per id and returns how many lines were written.
    ///
    /// A failed line is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Output`] if the final flush fails.
    pub async fn append<I>(&mut self, ids: I) -> Result<usize, DiscoveryError>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut written = 0;
        for app_id in ids {
            let line = format!("{app_id}\n");
            if let Err(e) = self.file.write_all(line.as_bytes()).await {
                error!(app_id, error = %e, "failed to append app id to file");
                continue;
            }
            debug!(app_id, "wrote app id to file");
            written += 1;
        }

        self.file
            .flush()
            .await
            .map_err(|e| DiscoveryError::output(&self.path, e))?;
        Ok(written)
    }
}
