//! Download module.
//!
//! This module provides:
//! - Track, video and collection downloads ([`Downloader`])
//! - Bounded retry of transient transfer failures
//! - ALAC conversion and metadata tagging
//! - In-flight download tracking
//! - Failure aggregation and reporting

pub mod orchestrator;
pub mod postprocess;
pub mod report;
pub mod retry;
pub mod status;
pub mod transfer;

#[cfg(test)]
pub mod stub;

pub use orchestrator::Downloader;
pub use postprocess::{
    EnrichmentOutcome, FfmpegTranscoder, LoftyTagger, PostProcessor, Tagger, Transcoder,
};
pub use report::{DownloadErrors, ErrorReporter, TracingReporter};
pub use retry::{fetch_with_retry, RetryResult};
pub use status::{DownloadStatus, TaskGuard};
pub use transfer::{HttpTransport, TransferOutcome, TransferStatus, Transport};
