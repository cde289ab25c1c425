//! The fetcher: one GET per attempt, staged on disk and renamed into place.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::config::{FetchOptions, FetcherConfig};
use crate::error::{FetchError, Result};

/// Timeout for a whole request, connect through last body byte.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const STAGING_PREFIX: &str = ".fetch-";
const STAGING_SUFFIX: &str = ".part";

/// A completed download.
///
/// The caller owns the file: nothing removes it after a successful fetch.
#[derive(Debug)]
pub struct Fetched {
    /// Where the body was written.
    pub path: PathBuf,
    /// The file, opened for reading at offset 0.
    pub file: File,
    /// Number of body bytes written.
    pub bytes: u64,
}

impl Fetched {
    /// Close the file and delete it.
    pub async fn remove(self) -> io::Result<()> {
        drop(self.file);
        tokio::fs::remove_file(&self.path).await
    }
}

/// Downloads remote resources into [`FetcherConfig::dest_dir`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Build a fetcher with its HTTP client.
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Local path for `url`: the hex Blake3 digest of the URL under the
    /// destination directory.
    pub fn destination(&self, url: &str) -> PathBuf {
        let digest = blake3::hash(url.as_bytes());
        self.config.dest_dir.join(digest.to_hex().as_str())
    }

    /// Download `url` to [`destination`](Self::destination).
    ///
    /// Returns `Ok(None)` for an empty URL. Every call downloads again. The
    /// body is staged in a hidden file under the destination directory and
    /// renamed over the destination once complete, so a [`Fetched`] handed out
    /// earlier keeps its contents. On error, or if the returned future is
    /// dropped early, the staging file is removed and the destination is left
    /// as it was.
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Option<Fetched>> {
        if url.is_empty() {
            tracing::debug!("empty url, nothing to fetch");
            return Ok(None);
        }

        let path = self.destination(url);
        let mut attempt = 1;

        loop {
            match self.fetch_once(url, &path, options).await {
                Ok(fetched) => {
                    tracing::debug!(
                        url,
                        path = %fetched.path.display(),
                        bytes = fetched.bytes,
                        attempt,
                        "downloaded file"
                    );
                    return Ok(Some(fetched));
                }
                Err(e) if e.is_retryable() && options.retry.allows_retry(attempt) => {
                    let delay = options.retry.backoff(attempt);
                    tracing::warn!(url, attempt, ?delay, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(url, path = %path.display(), attempt, error = %e, "error downloading file");
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, path: &Path, options: &FetchOptions) -> Result<Fetched> {
        let dest_dir = &self.config.dest_dir;
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(FetchError::local_io(dest_dir))?;

        let mut request = self.client.get(url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        // The staging file is deleted when `staged` drops, unless persisted.
        let (file, staged) = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dest_dir)
            .map_err(FetchError::local_io(dest_dir))?
            .into_parts();

        let mut writer = BufWriter::new(File::from_std(file));
        let mut body = response.bytes_stream();
        let mut bytes = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(FetchError::local_io(&*staged))?;
            bytes += chunk.len() as u64;
        }

        writer.flush().await.map_err(FetchError::local_io(&*staged))?;
        let file = writer.into_inner();
        file.sync_all().await.map_err(FetchError::local_io(&*staged))?;
        drop(file);

        // Opened before the rename so the reader sees this download even if
        // another fetch of the same url replaces the destination afterwards.
        let reader = File::open(&*staged)
            .await
            .map_err(FetchError::local_io(&*staged))?;

        staged
            .persist(path)
            .map_err(|e| FetchError::local_io(path)(e.error))?;

        Ok(Fetched {
            path: path.to_path_buf(),
            file: reader,
            bytes,
        })
    }
}
