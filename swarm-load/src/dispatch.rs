use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::generate::SimulatedSensor;
use crate::report::{RunSummary, SendOutcome};
use crate::transport::Transport;

/// Drives send attempts for a fleet of simulated sensors against one
/// transport.
///
/// Tasks share nothing mutable beyond the cancellation token and the
/// outcome channel; each owns its sensor and its batch.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    sensors: Vec<SimulatedSensor>,
    batch_size: usize,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        sensors: Vec<SimulatedSensor>,
        batch_size: usize,
    ) -> Self {
        Self {
            transport,
            sensors,
            batch_size,
        }
    }

    /// One send attempt per sensor, at most `max_in_flight` concurrently.
    ///
    /// Every spawned attempt reports exactly one outcome unless the run is
    /// cancelled before it sends. Outcomes arrive in completion order.
    pub async fn run_oneshot(
        &self,
        max_in_flight: usize,
        max_delay: Duration,
        cancel: CancellationToken,
    ) -> RunSummary {
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
        let (tx, rx) = mpsc::channel(self.sensors.len().max(1));

        for sensor in self.sensors.iter().cloned() {
            let transport = Arc::clone(&self.transport);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let tx = tx.clone();
            let batch_size = self.batch_size;

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if cancel.is_cancelled() {
                    return;
                }

                // random stagger before sending
                let delay = random_delay(max_delay);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }

                let outcome = send_once(transport.as_ref(), &sensor, batch_size, 0).await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        collect(rx, started).await
    }

    /// One independent repeating loop per sensor until the token is
    /// cancelled.
    ///
    /// Loops observe the token at every suspension point, so cancellation
    /// takes effect within one sleep interval; an in-flight send is allowed
    /// to complete or time out first.
    pub async fn run_periodic(
        &self,
        interval: Duration,
        jitter: Duration,
        cancel: CancellationToken,
    ) -> RunSummary {
        let started = Instant::now();
        let (tx, rx) = mpsc::channel(64);

        let mut handles = Vec::with_capacity(self.sensors.len());
        for sensor in self.sensors.iter().cloned() {
            handles.push(tokio::spawn(run_sensor_loop(
                Arc::clone(&self.transport),
                sensor,
                self.batch_size,
                interval,
                jitter,
                cancel.clone(),
                tx.clone(),
            )));
        }
        drop(tx);

        let summary = collect(rx, started).await;

        for handle in handles {
            let _ = handle.await;
        }

        summary
    }
}

#[instrument(name = "sensor_loop", skip_all, fields(sensor_id = sensor.id().0))]
async fn run_sensor_loop(
    transport: Arc<dyn Transport>,
    sensor: SimulatedSensor,
    batch_size: usize,
    interval: Duration,
    jitter: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<SendOutcome>,
) {
    // stagger the first send so the fleet does not burst in lockstep
    let initial = random_delay(jitter.min(interval));
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(initial) => {}
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    let mut attempt: u64 = 0;

    while !cancel.is_cancelled() {
        let extra = random_delay(jitter);
        if !extra.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(extra) => {}
            }
        }

        let outcome = send_once(transport.as_ref(), &sensor, batch_size, attempt).await;
        if tx.send(outcome).await.is_err() {
            break;
        }
        attempt += 1;

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
    }

    info!("Sensor loop shut down");
}

async fn send_once(
    transport: &dyn Transport,
    sensor: &SimulatedSensor,
    batch_size: usize,
    attempt: u64,
) -> SendOutcome {
    let payload = sensor.next_batch(batch_size).to_bytes();

    let started = Instant::now();
    let result = transport.send(payload).await;

    SendOutcome {
        sensor_id: sensor.id(),
        attempt,
        result,
        elapsed: started.elapsed(),
    }
}

async fn collect(mut rx: mpsc::Receiver<SendOutcome>, started: Instant) -> RunSummary {
    let mut summary = RunSummary::default();

    while let Some(outcome) = rx.recv().await {
        log_outcome(&outcome);
        summary.record(&outcome);
    }

    summary.elapsed = started.elapsed();
    summary
}

fn log_outcome(outcome: &SendOutcome) {
    match &outcome.result {
        Ok(ack) => info!(
            sensor_id = outcome.sensor_id.0,
            attempt = outcome.attempt,
            status = ack.status,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Batch sent"
        ),
        Err(e) => warn!(
            sensor_id = outcome.sensor_id.0,
            attempt = outcome.attempt,
            error = %e,
            "Batch send failed"
        ),
    }
}

fn random_delay(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let mut rng = rand::rng();
    Duration::from_secs_f64(rng.random_range(0.0..max.as_secs_f64()))
}
