use std::time::Duration;

use swarm_core::SensorId;

use crate::transport::{SendAck, TransportError};

/// Result of a single send attempt.
///
/// Every attempt produces exactly one outcome, success or failure; failures
/// are never escalated past this value.
#[derive(Debug)]
pub struct SendOutcome {
    pub sensor_id: SensorId,
    /// Per-sensor attempt counter, 0 for one-shot runs.
    pub attempt: u64,
    pub result: Result<SendAck, TransportError>,
    /// Wall time of the transport call alone, excluding jitter sleeps.
    pub elapsed: Duration,
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregated results of a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &SendOutcome) {
        self.attempts += 1;
        if outcome.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    /// Fraction of successful attempts, 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }
}
