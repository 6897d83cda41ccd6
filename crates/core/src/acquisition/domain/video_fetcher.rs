use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to launch downloader `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed for {url}: {reason}")]
    Download { url: String, reason: String },
    #[error("downloader reported {path} but no file is present")]
    Missing { path: PathBuf },
}

/// Domain interface for fetching a remote video to local scratch storage.
///
/// Implementations return the downloaded file's path only after confirming
/// it exists; every internal failure surfaces as a `FetchError`, never a
/// panic. Ownership of the file passes to the caller, who is responsible
/// for deleting it before the request completes.
pub trait VideoFetcher: Send {
    fn fetch(&self, url: &str, scratch_dir: &Path) -> Result<PathBuf, FetchError>;
}
