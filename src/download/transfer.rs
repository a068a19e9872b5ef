//! Single file transfers.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Status code of a transfer that should be attempted again right away.
pub const TRANSIENT_STATUS_CODE: i32 = 1001;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// How a single transfer attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Completed,
    /// Terminal failure, with the HTTP status if the server answered.
    Failed(Option<u16>),
    /// Retryable failure such as a reset connection.
    Transient,
}

/// Result of one transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub ok: bool,
    pub status: TransferStatus,
}

impl TransferOutcome {
    pub fn completed() -> Self {
        Self {
            ok: true,
            status: TransferStatus::Completed,
        }
    }

    pub fn failed(http_status: Option<u16>) -> Self {
        Self {
            ok: false,
            status: TransferStatus::Failed(http_status),
        }
    }

    pub fn transient() -> Self {
        Self {
            ok: false,
            status: TransferStatus::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.status == TransferStatus::Transient
    }

    /// Numeric status code: 0 on success, the HTTP status (or -1) on failure,
    /// [`TRANSIENT_STATUS_CODE`] for transient failures.
    pub fn status_code(&self) -> i32 {
        match self.status {
            TransferStatus::Completed => 0,
            TransferStatus::Failed(Some(code)) => i32::from(code),
            TransferStatus::Failed(None) => -1,
            TransferStatus::Transient => TRANSIENT_STATUS_CODE,
        }
    }
}

/// Fetches one remote resource into one local file.
///
/// Implementations make exactly one attempt per call; retrying is up to the
/// caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn download(&self, url: &str, path: &Path, overwrite: bool) -> TransferOutcome;
}

/// Transport over HTTP(S).
pub struct HttpTransport {
    client: Client,
    show_progress: bool,
}

impl HttpTransport {
    pub fn new(show_progress: bool) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            show_progress,
        })
    }

    /// Stream a response body into a file, truncating what was there.
    async fn write_body(&self, response: Response, path: &Path) -> Result<u64> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content_length = response.content_length();
        let progress = match content_length {
            Some(len) if self.show_progress && len > PROGRESS_THRESHOLD => {
                Some(create_download_bar(len))
            }
            _ => None,
        };

        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn download(&self, url: &str, path: &Path, overwrite: bool) -> TransferOutcome {
        if !overwrite && path.exists() {
            tracing::warn!("Refusing to overwrite {}", path.display());
            return TransferOutcome::failed(None);
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return outcome_for_error(&Error::Http(e), path),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} while downloading {}", status, path.display());
            return if is_transient_status(status) {
                TransferOutcome::transient()
            } else {
                TransferOutcome::failed(Some(status.as_u16()))
            };
        }

        match self.write_body(response, path).await {
            Ok(bytes) => {
                tracing::debug!("Wrote {} bytes to {}", bytes, path.display());
                TransferOutcome::completed()
            }
            Err(e) => {
                // Don't leave a truncated file behind
                let _ = fs::remove_file(path).await;
                outcome_for_error(&e, path)
            }
        }
    }
}

fn outcome_for_error(error: &Error, path: &Path) -> TransferOutcome {
    if is_transient(error) {
        tracing::debug!("Transient error for {}: {}", path.display(), error);
        TransferOutcome::transient()
    } else {
        tracing::warn!("Download of {} failed: {}", path.display(), error);
        TransferOutcome::failed(None)
    }
}

/// Whether an error is a connection-level hiccup worth retrying.
pub fn is_transient(error: &Error) -> bool {
    match error {
        Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_body(),
        Error::Io(e) => matches!(
            e.kind(),
            std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::Interrupted
        ),
        _ => false,
    }
}

/// Whether an HTTP status means "try again" rather than "no".
fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
