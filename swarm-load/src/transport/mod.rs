pub mod http;
pub mod mock;
pub mod tcp;

use std::time::Duration;

use async_trait::async_trait;

/// Acknowledgment from the receiving endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendAck {
    pub status: u16,
}

/// Everything that can go wrong during a single send attempt.
///
/// All variants are non-fatal; the dispatch loop folds them into the
/// attempt's outcome and moves on.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Endpoint answered with status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed response: {0}")]
    BadResponse(String),
}

/// Trait for delivering an encoded batch to the target.
///
/// Implementations own their connection handling; a send either yields the
/// endpoint's acknowledgment or a `TransportError`, never both.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver one encoded batch. The payload is consumed; batches are
    /// never reused across attempts.
    async fn send(&self, payload: Vec<u8>) -> Result<SendAck, TransportError>;
}
