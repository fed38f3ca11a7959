use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{SendAck, Transport, TransportError};

/// Transport that acknowledges sends without touching the network.
///
/// Used as the dry-run transport variant and by the dispatch tests.
/// Responses can be scripted per send; once the script runs out, every
/// further send is answered with the fallback status.
pub struct MockTransport {
    latency: Duration,
    fallback: u16,
    scripted: Mutex<VecDeque<u16>>,
    sent: Mutex<Vec<Vec<u8>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    /// A transport that answers 200 to everything.
    pub fn ok() -> Self {
        Self::with_fallback(200)
    }

    pub fn with_fallback(status: u16) -> Self {
        Self {
            latency: Duration::ZERO,
            fallback: status,
            scripted: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay each send, to make concurrency observable in tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue statuses answered before falling back.
    pub fn script(self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.scripted.lock().unwrap().extend(statuses);
        self
    }

    /// Payloads received so far, in arrival order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Highest number of sends observed in flight at once.
    pub fn max_in_flight_seen(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, payload: Vec<u8>) -> Result<SendAck, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.sent.lock().unwrap().push(payload);
        let status = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if status == 200 {
            Ok(SendAck { status })
        } else {
            Err(TransportError::Status(status))
        }
    }
}
